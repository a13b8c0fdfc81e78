//! Authenticated caller extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use domain::models::Principal;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated caller resolved from the bearer token.
///
/// Reuses the principal inserted by the auth middleware when present,
/// otherwise resolves the `Authorization` header itself.
#[derive(Debug, Clone)]
pub struct UserAuth(pub Principal);

impl UserAuth {
    pub fn user_id(&self) -> Uuid {
        self.0.user_id
    }

    pub fn principal(&self) -> &Principal {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0.is_admin()
    }

    /// Resolves the bearer credential in `parts` through the configured resolver.
    pub async fn resolve(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                ApiError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

        let principal = state.credentials.resolve(bearer.token()).map_err(|e| {
            tracing::debug!("Credential resolution failed: {}", e);
            ApiError::from(e)
        })?;

        Ok(UserAuth(principal))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }

        UserAuth::resolve(parts, state).await
    }
}
