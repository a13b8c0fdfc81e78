//! Identity capability consumed by the HTTP layer.

use thiserror::Error;

use crate::models::Principal;

/// Errors raised while resolving caller credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid or expired credentials")]
    InvalidCredentials,
}

/// Resolves a bearer credential into an authenticated principal.
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, bearer_token: &str) -> Result<Principal, IdentityError>;
}

/// Static resolver for tests. Maps fixed tokens to principals.
#[derive(Debug, Default, Clone)]
pub struct MockCredentialResolver {
    principals: Vec<(String, Principal)>,
}

impl MockCredentialResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_principal(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.principals.push((token.into(), principal));
        self
    }
}

impl CredentialResolver for MockCredentialResolver {
    fn resolve(&self, bearer_token: &str) -> Result<Principal, IdentityError> {
        if bearer_token.is_empty() {
            return Err(IdentityError::MissingCredentials);
        }
        self.principals
            .iter()
            .find(|(token, _)| token == bearer_token)
            .map(|(_, principal)| principal.clone())
            .ok_or(IdentityError::InvalidCredentials)
    }
}
