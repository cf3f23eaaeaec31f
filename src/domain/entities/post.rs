//! Post entity and repository trait.
//!
//! Maps to the `posts` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::group::Group;
use crate::domain::value_objects::FeedScope;
use crate::shared::error::AppError;

/// A post written by a user.
///
/// Maps to the `posts` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - text: TEXT NOT NULL
/// - pub_date: TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// - author_id: BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE
/// - group_id: BIGINT NULL REFERENCES groups(id) ON DELETE SET NULL
/// - image: VARCHAR(255) NULL
///
/// `author_id` and `pub_date` are fixed at creation; `text`, `group_id` and
/// `image` may change on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub group_id: Option<i64>,
    /// Stored media path, e.g. `posts/small.gif`
    pub image: Option<String>,
}

impl Post {
    pub fn is_author(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }

    /// The first `max_chars` characters of the text.
    pub fn short_text(&self, max_chars: usize) -> String {
        self.text.chars().take(max_chars).collect()
    }
}

/// Writes the post text; a precision (`{:.15}`) truncates it to that many
/// characters.
impl std::fmt::Display for Post {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match f.precision() {
            Some(max_chars) => f.write_str(&self.short_text(max_chars)),
            None => f.write_str(&self.text),
        }
    }
}

/// Author fields shown next to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
    pub full_name: String,
}

impl AuthorRef {
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.username
        } else {
            &self.full_name
        }
    }
}

/// A post joined with its author and group, ready for a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCard {
    pub post: Post,
    pub author: AuthorRef,
    pub group: Option<Group>,
}

/// Repository trait for Post data access operations.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, AppError>;

    /// Find a post together with its author and group.
    async fn find_card(&self, id: i64) -> Result<Option<PostCard>, AppError>;

    async fn create(&self, post: &Post) -> Result<Post, AppError>;

    /// Persist the mutable fields (`text`, `group_id`, `image`) of `post`.
    async fn update(&self, post: &Post) -> Result<Post, AppError>;

    /// Delete a post and, through the cascade, its comments.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Number of posts within `scope`.
    async fn count(&self, scope: FeedScope) -> Result<u64, AppError>;

    /// Posts within `scope`, newest first (`pub_date` DESC, `id` DESC).
    async fn list(
        &self,
        scope: FeedScope,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<PostCard>, AppError>;
}
