//! Authentication Service
//!
//! Handles sign-up, password login and session tokens. A session is a signed
//! JWT carrying the user id; it lives in a cookie and is checked on every
//! request.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::application::dto::SignupForm;
use crate::config::AuthSettings;
use crate::domain::{SessionUser, User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Name of the cookie holding the session token.
pub const SESSION_COOKIE: &str = "session";

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account from an already validated form.
    async fn signup(&self, form: &SignupForm) -> Result<User, AuthError>;

    /// Check a username/password pair.
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError>;

    /// Sign a session token for `user_id`.
    fn issue_session(&self, user_id: i64) -> Result<String, AuthError>;

    /// The user a session token belongs to; `None` when the token is invalid,
    /// expired, or names a user that no longer exists.
    async fn resolve_session(&self, token: &str) -> Result<Option<SessionUser>, AuthError>;
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Please enter a correct username and password.")]
    InvalidCredentials,

    #[error("A user with that username already exists.")]
    UsernameExists,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Storage(#[from] AppError),
}

/// AuthService implementation
pub struct AuthServiceImpl {
    user_repo: Arc<dyn UserRepository>,
    id_generator: Arc<SnowflakeGenerator>,
    settings: AuthSettings,
}

impl AuthServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        id_generator: Arc<SnowflakeGenerator>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            user_repo,
            id_generator,
            settings,
        }
    }

    /// Hash a password using Argon2id
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn decode_token(&self, token: &str) -> Result<i64, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.settings.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        token_data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn signup(&self, form: &SignupForm) -> Result<User, AuthError> {
        let username = form.username.trim();
        if self.user_repo.username_exists(username).await? {
            return Err(AuthError::UsernameExists);
        }

        let user = User {
            id: self.id_generator.generate(),
            username: username.to_string(),
            email: form.email(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            password_hash: self.hash_password(&form.password1)?,
            date_joined: Utc::now(),
        };

        let created = self.user_repo.create(&user).await.map_err(|e| match e {
            AppError::Conflict(_) => AuthError::UsernameExists,
            e => AuthError::Storage(e),
        })?;

        metrics::record_content_created("user");
        info!(user_id = created.id, username = %created.username, "User signed up");
        Ok(created)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .user_repo
            .find_by_username(username.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.verify_password(password, &user.password_hash)? {
            debug!(username = %user.username, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    fn issue_session(&self, user_id: i64) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::minutes(self.settings.session_ttl_minutes)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.settings.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token generation failed: {}", e)))
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<SessionUser>, AuthError> {
        let user_id = match self.decode_token(token) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        Ok(self
            .user_repo
            .find_by_id(user_id)
            .await?
            .map(|u| u.session_user()))
    }
}
