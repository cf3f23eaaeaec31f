//! Follow relation and repository trait.
//!
//! Maps to the `follows` table: a directed edge from a reader to an author.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// `user_id` follows `author_id`.
///
/// Maps to the `follows` table:
/// - user_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - author_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - PRIMARY KEY (user_id, author_id)
/// - CHECK (user_id <> author_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follow {
    pub user_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(user_id: i64, author_id: i64) -> Self {
        Self {
            user_id,
            author_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_self_follow(&self) -> bool {
        self.user_id == self.author_id
    }
}

/// Repository trait for Follow data access operations.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Insert the edge. Returns `false` when it already existed.
    async fn create(&self, follow: &Follow) -> Result<bool, AppError>;

    /// Remove the edge. Returns `false` when there was nothing to remove.
    async fn delete(&self, user_id: i64, author_id: i64) -> Result<bool, AppError>;

    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, AppError>;

    /// How many users follow `author_id`.
    async fn count_followers(&self, author_id: i64) -> Result<u64, AppError>;

    /// How many authors `user_id` follows.
    async fn count_following(&self, user_id: i64) -> Result<u64, AppError>;
}
