//! Application services.

pub mod admin_bootstrap;
pub mod auth;
pub mod identity;

pub use admin_bootstrap::{bootstrap_admin, BootstrapError, BootstrapOutcome};
pub use auth::{AuthError, AuthResult, AuthService, RefreshResult};
pub use identity::JwtCredentialResolver;
