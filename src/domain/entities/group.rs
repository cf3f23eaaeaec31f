//! Group entity and repository trait.
//!
//! Maps to the `groups` table. Groups are created ahead of posts and are
//! referenced, never owned, by them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// A topical community posts can be filed under.
///
/// Maps to the `groups` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - title: VARCHAR(200) NOT NULL
/// - slug: VARCHAR(50) NOT NULL UNIQUE
/// - description: TEXT NOT NULL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub title: String,
    /// URL-safe identifier, globally unique
    pub slug: String,
    pub description: String,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

/// Slugs are 1-50 ASCII letters, digits, hyphens or underscores.
pub fn is_valid_slug(slug: &str) -> bool {
    (1..=50).contains(&slug.len())
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Repository trait for Group data access operations.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, AppError>;

    /// All groups ordered by title, for the post form's select box.
    async fn list_all(&self) -> Result<Vec<Group>, AppError>;

    /// Create a group. Fails with `Conflict` when the slug is taken.
    async fn create(&self, group: &Group) -> Result<Group, AppError>;
}
