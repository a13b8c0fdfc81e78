//! JWT-backed credential resolver.

use std::sync::Arc;

use domain::models::Principal;
use domain::services::{CredentialResolver, IdentityError};
use shared::jwt::{extract_user_id, JwtConfig};

/// Resolves access tokens issued by [`crate::services::auth::AuthService`].
///
/// Roles are taken from the token claims; no database lookup is made.
#[derive(Debug, Clone)]
pub struct JwtCredentialResolver {
    jwt: Arc<JwtConfig>,
}

impl JwtCredentialResolver {
    pub fn new(jwt: Arc<JwtConfig>) -> Self {
        Self { jwt }
    }
}

impl CredentialResolver for JwtCredentialResolver {
    fn resolve(&self, bearer_token: &str) -> Result<Principal, IdentityError> {
        if bearer_token.is_empty() {
            return Err(IdentityError::MissingCredentials);
        }

        let claims = self.jwt.validate_access_token(bearer_token).map_err(|e| {
            tracing::debug!("Access token rejected: {}", e);
            IdentityError::InvalidCredentials
        })?;
        let user_id = extract_user_id(&claims).map_err(|_| IdentityError::InvalidCredentials)?;

        Ok(Principal::from_role_names(user_id, &claims.roles))
    }
}
