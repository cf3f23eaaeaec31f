//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a registered account.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - username: VARCHAR(150) NOT NULL UNIQUE
/// - email: VARCHAR(254) NULL
/// - first_name: VARCHAR(150) NOT NULL DEFAULT ''
/// - last_name: VARCHAR(150) NOT NULL DEFAULT ''
/// - password_hash: VARCHAR(255) NOT NULL
/// - date_joined: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Username (1-150 characters, unique)
    pub username: String,

    /// Optional contact address
    pub email: Option<String>,

    pub first_name: String,

    pub last_name: String,

    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Registration timestamp
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// "First Last", trimmed; empty when neither name is set.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Name shown on pages: the full name when present, else the username.
    pub fn display_name(&self) -> String {
        let full = self.full_name();
        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }

    /// The identity carried by a logged-in request.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: 0,
            username: String::new(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            date_joined: Utc::now(),
        }
    }
}

/// The authenticated visitor of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
}

/// Check that a username only uses letters, digits and `@.+-_`.
pub fn is_valid_username(username: &str) -> bool {
    let len = username.chars().count();
    (1..=150).contains(&len)
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

/// Repository trait for User data access operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Find a user by username (exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Check whether a username is taken.
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;

    /// Create a new user. Fails with `Conflict` when the username is taken.
    async fn create(&self, user: &User) -> Result<User, AppError>;
}
