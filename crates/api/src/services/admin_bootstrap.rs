//! Admin bootstrap for initial setup.
//!
//! Ensures the configured administrator account exists and holds the Admin
//! role. Safe to run on every start.

use domain::models::Role;
use persistence::repositories::UserRepository;
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::AdminSeedConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Outcome of a bootstrap run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// No admin seed configured.
    Skipped,
    /// Account created and granted Admin.
    Created,
    /// Account existed; Admin was granted.
    RoleGranted,
    /// Account existed and already held Admin.
    Unchanged,
}

/// Bootstrap the admin user if configured.
///
/// Call after migrations. An existing account keeps its password; only the
/// role grant is ensured.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminSeedConfig,
) -> Result<BootstrapOutcome, BootstrapError> {
    if config.is_partial() {
        warn!(
            "Only one of TODO_API__ADMIN__SEED_EMAIL and TODO_API__ADMIN__SEED_PASSWORD is set, \
             skipping admin seed"
        );
        return Ok(BootstrapOutcome::Skipped);
    }
    if !config.is_configured() {
        return Ok(BootstrapOutcome::Skipped);
    }

    let users = UserRepository::new(pool.clone());
    let email = config.seed_email.trim();

    let (user_id, created) = match users.find_by_email(email).await? {
        Some(user) => (user.id, false),
        None => {
            let password_hash = hash_password(&config.seed_password)?;
            let user = users
                .create_user(email, &password_hash, Some("Administrator"))
                .await?;
            (user.id, true)
        }
    };

    let granted = users.grant_role(user_id, Role::Admin.as_str()).await?;

    let outcome = match (created, granted) {
        (true, _) => BootstrapOutcome::Created,
        (false, true) => BootstrapOutcome::RoleGranted,
        (false, false) => BootstrapOutcome::Unchanged,
    };

    info!(email = %email, user_id = %user_id, ?outcome, "Admin bootstrap finished");
    Ok(outcome)
}
