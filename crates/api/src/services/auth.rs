//! Authentication service for user registration, login, and token refresh.

use std::sync::Arc;

use chrono::Utc;
use domain::models::Role;
use persistence::repositories::UserRepository;
use shared::crypto::sha256_hex;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::validate_password_strength;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Password does not meet requirements")]
    WeakPassword(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub roles: Vec<String>,
    pub access_token: String,
    pub refresh_token: String,
    pub access_token_expires_in: i64,
}

/// Token pair with metadata.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub access_token_jti: String,
    pub refresh_token: String,
    pub refresh_token_jti: String,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Database row for session query.
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    expires_at: chrono::DateTime<Utc>,
}

/// Authentication service.
pub struct AuthService {
    pool: PgPool,
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT configuration.
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            pool,
            jwt,
        }
    }

    /// Registers a new account. New accounts carry no roles.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<AuthResult, AuthError> {
        validate_password_strength(password).map_err(|e| {
            AuthError::WeakPassword(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Password does not meet requirements".to_string()),
            )
        })?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(password)?;

        let user = match self
            .users
            .create_user(email, &password_hash, display_name)
            .await
        {
            Ok(user) => user,
            // 23505 = unique_violation, a concurrent registration won the race
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
                return Err(AuthError::EmailAlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let tokens = self.generate_tokens(user.id, &[])?;
        self.create_session(user.id, &tokens).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            roles: Vec::new(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.jwt.access_token_expiry_secs,
        })
    }

    /// Authenticates with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let password_hash = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.users.update_last_login(user.id, Utc::now()).await?;

        let roles = self.current_roles(user.id).await?;
        let tokens = self.generate_tokens(user.id, &roles)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            display_name: user.display_name,
            roles,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_token_expires_in: self.jwt.access_token_expiry_secs,
        })
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The session is rotated: the presented refresh token stops working.
    /// Roles are re-read so grants take effect on the next refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .jwt
            .validate_refresh_token(refresh_token)
            .map_err(|e| match e {
                JwtError::TokenExpired | JwtError::InvalidToken => AuthError::InvalidRefreshToken,
                _ => AuthError::TokenError(e),
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;
        let jti_hash = sha256_hex(&claims.jti);

        let session: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, expires_at
            FROM user_sessions
            WHERE refresh_token_hash = $1 AND user_id = $2
            "#,
        )
        .bind(&jti_hash)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let session = session.ok_or(AuthError::SessionNotFound)?;

        if session.expires_at < Utc::now() {
            sqlx::query("DELETE FROM user_sessions WHERE id = $1")
                .bind(session.id)
                .execute(&self.pool)
                .await?;
            return Err(AuthError::InvalidRefreshToken);
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        let roles = self.current_roles(user_id).await?;
        let new_tokens = self.generate_tokens(user_id, &roles)?;

        let now = Utc::now();
        let new_expires_at = now + chrono::Duration::seconds(self.jwt.refresh_token_expiry_secs);

        // Only the caller that still holds the current refresh hash rotates it
        let rotated = sqlx::query(
            r#"
            UPDATE user_sessions
            SET token_hash = $1, refresh_token_hash = $2, expires_at = $3, last_used_at = $4
            WHERE id = $5 AND refresh_token_hash = $6
            "#,
        )
        .bind(sha256_hex(&new_tokens.access_token_jti))
        .bind(sha256_hex(&new_tokens.refresh_token_jti))
        .bind(new_expires_at)
        .bind(now)
        .bind(session.id)
        .bind(&jti_hash)
        .execute(&self.pool)
        .await?;

        if rotated.rows_affected() != 1 {
            tracing::debug!(session_id = %session.id, "Refresh token already rotated");
            return Err(AuthError::InvalidRefreshToken);
        }

        Ok(RefreshResult {
            access_token: new_tokens.access_token,
            refresh_token: new_tokens.refresh_token,
            expires_in: self.jwt.access_token_expiry_secs,
        })
    }

    /// Known role names held by a user. Unknown stored names are dropped.
    async fn current_roles(&self, user_id: Uuid) -> Result<Vec<String>, AuthError> {
        let names = self.users.find_role_names(user_id).await?;
        Ok(known_roles(names))
    }

    fn generate_tokens(&self, user_id: Uuid, roles: &[String]) -> Result<TokenPair, AuthError> {
        let (access_token, access_jti) = self.jwt.generate_access_token(user_id, roles)?;
        let (refresh_token, refresh_jti) = self.jwt.generate_refresh_token(user_id)?;

        Ok(TokenPair {
            access_token,
            access_token_jti: access_jti,
            refresh_token,
            refresh_token_jti: refresh_jti,
        })
    }

    async fn create_session(&self, user_id: Uuid, tokens: &TokenPair) -> Result<(), AuthError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.jwt.refresh_token_expiry_secs);

        sqlx::query(
            r#"
            INSERT INTO user_sessions (id, user_id, token_hash, refresh_token_hash, expires_at, created_at, last_used_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sha256_hex(&tokens.access_token_jti))
        .bind(sha256_hex(&tokens.refresh_token_jti))
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn known_roles(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter_map(|name| name.parse::<Role>().ok())
        .map(|role| role.to_string())
        .collect()
}
