//! Follow Service
//!
//! Subscribing to authors. Following yourself is ignored and a repeated
//! follow leaves a single subscription.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::{Follow, FollowRepository, User, UserRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum FollowError {
    #[error("User not found")]
    AuthorNotFound,

    #[error(transparent)]
    Storage(#[from] AppError),
}

#[async_trait]
pub trait FollowService: Send + Sync {
    /// Subscribe `user_id` to `author`. Returns whether a subscription was added.
    async fn follow(&self, user_id: i64, author: &str) -> Result<bool, FollowError>;

    /// Returns whether a subscription was removed.
    async fn unfollow(&self, user_id: i64, author: &str) -> Result<bool, FollowError>;
}

pub struct FollowServiceImpl {
    follow_repo: Arc<dyn FollowRepository>,
    user_repo: Arc<dyn UserRepository>,
}

impl FollowServiceImpl {
    pub fn new(follow_repo: Arc<dyn FollowRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self {
            follow_repo,
            user_repo,
        }
    }

    async fn author(&self, username: &str) -> Result<User, FollowError> {
        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or(FollowError::AuthorNotFound)
    }
}

#[async_trait]
impl FollowService for FollowServiceImpl {
    async fn follow(&self, user_id: i64, author: &str) -> Result<bool, FollowError> {
        let author = self.author(author).await?;
        let follow = Follow::new(user_id, author.id);
        if follow.is_self_follow() {
            debug!(user_id, "Ignoring self-follow");
            return Ok(false);
        }

        let created = self.follow_repo.create(&follow).await?;
        if created {
            metrics::record_content_created("follow");
            info!(user_id, author_id = author.id, "Followed author");
        }
        Ok(created)
    }

    async fn unfollow(&self, user_id: i64, author: &str) -> Result<bool, FollowError> {
        let author = self.author(author).await?;
        let removed = self.follow_repo.delete(user_id, author.id).await?;
        if removed {
            info!(user_id, author_id = author.id, "Unfollowed author");
        }
        Ok(removed)
    }
}
