//! Authentication routes for registration, login, and token refresh.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::auth::{AuthError, AuthResult, AuthService};

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Strength is checked by the auth service
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Display name must be 1-100 characters"))]
    pub display_name: Option<String>,
}

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokensResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl TokensResponse {
    fn bearer(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Response body for register and login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokensResponse,
}

impl From<AuthResult> for AuthResponse {
    fn from(result: AuthResult) -> Self {
        Self {
            user: UserResponse {
                id: result.user_id.to_string(),
                email: result.email,
                display_name: result.display_name,
                roles: result.roles,
            },
            tokens: TokensResponse::bearer(
                result.access_token,
                result.refresh_token,
                result.access_token_expires_in,
            ),
        }
    }
}

/// Response body for token refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub tokens: TokensResponse,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => {
                ApiError::Conflict("Email already registered".to_string())
            }
            AuthError::WeakPassword(msg) => ApiError::Validation(msg),
            AuthError::InvalidCredentials | AuthError::UserNotFound => {
                ApiError::Unauthorized("Invalid email or password".to_string())
            }
            AuthError::UserDisabled => ApiError::Unauthorized("Account is disabled".to_string()),
            AuthError::InvalidRefreshToken | AuthError::SessionNotFound => {
                ApiError::Unauthorized("Invalid or expired refresh token".to_string())
            }
            AuthError::DatabaseError(db_err) => ApiError::from(db_err),
            AuthError::PasswordError(e) => ApiError::Internal(format!("Password error: {}", e)),
            AuthError::TokenError(e) => ApiError::Internal(format!("Token error: {}", e)),
        }
    }
}

fn auth_service(state: &AppState) -> AuthService {
    AuthService::new(state.pool.clone(), state.jwt.clone())
}

/// Register a new user with email and password.
///
/// POST /api/v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let result = auth_service(&state)
        .register(
            &request.email,
            &request.password,
            request.display_name.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// Log in with email and password.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let result = auth_service(&state)
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(result.into()))
}

/// Exchange a refresh token for a new token pair. The old session is rotated.
///
/// POST /api/v1/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let Json(request) = payload?;
    request.validate()?;

    let result = auth_service(&state).refresh(&request.refresh_token).await?;

    Ok(Json(RefreshResponse {
        tokens: TokensResponse::bearer(
            result.access_token,
            result.refresh_token,
            result.expires_in,
        ),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use uuid::Uuid;

    #[test]
    fn test_register_request_validation() {
        let request = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "SecureP@ss1".to_string(),
            display_name: Some("Test User".to_string()),
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_without_display_name() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"email": "test@example.com", "password": "SecureP@ss1"}"#,
        )
        .unwrap();

        assert!(request.display_name.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_invalid_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "SecureP@ss1".to_string(),
            display_name: None,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_request_long_display_name() {
        let request = RegisterRequest {
            email: "test@example.com".to_string(),
            password: "SecureP@ss1".to_string(),
            display_name: Some("A".repeat(101)),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_login_request_empty_password() {
        let request = LoginRequest {
            email: "test@example.com".to_string(),
            password: String::new(),
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_refresh_request_camel_case() {
        let request: RefreshRequest =
            serde_json::from_str(r#"{"refreshToken": "abc"}"#).unwrap();
        assert_eq!(request.refresh_token, "abc");
    }

    #[test]
    fn test_auth_response_shape() {
        let response = AuthResponse::from(AuthResult {
            user_id: Uuid::nil(),
            email: "admin@example.com".to_string(),
            display_name: None,
            roles: vec!["admin".to_string()],
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            access_token_expires_in: 3600,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["roles"][0], "admin");
        assert_eq!(json["tokens"]["accessToken"], "access");
        assert_eq!(json["tokens"]["tokenType"], "Bearer");
        assert_eq!(json["tokens"]["expiresIn"], 3600);
    }

    #[test]
    fn test_auth_error_status_codes() {
        let cases = [
            (AuthError::EmailAlreadyExists, StatusCode::CONFLICT),
            (
                AuthError::WeakPassword("too short".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound, StatusCode::UNAUTHORIZED),
            (AuthError::UserDisabled, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidRefreshToken, StatusCode::UNAUTHORIZED),
            (AuthError::SessionNotFound, StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
