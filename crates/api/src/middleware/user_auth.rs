//! User authentication middleware.
//!
//! Resolves the bearer token on protected routes and stores the caller in
//! request extensions for handlers and the rate limiter.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::UserAuth;

/// Middleware that requires an authenticated caller.
pub async fn require_user_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    match UserAuth::resolve(&mut parts, &state).await {
        Ok(auth) => {
            tracing::Span::current().record("user_id", tracing::field::display(auth.user_id()));
            parts.extensions.insert(auth);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(err) => err.into_response(),
    }
}

/// Middleware that requires the Admin role.
///
/// Must run after [`require_user_auth`].
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<UserAuth>() {
        Some(auth) if auth.is_admin() => next.run(req).await,
        Some(auth) => {
            tracing::info!(user_id = %auth.user_id(), "Admin role required");
            ApiError::Forbidden("Admin role required".to_string()).into_response()
        }
        None => ApiError::Unauthorized("Authentication required".to_string()).into_response(),
    }
}
