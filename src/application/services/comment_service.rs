//! Comment Service

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::domain::{Comment, CommentRepository, PostRepository};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Post not found")]
    PostNotFound,

    #[error("This field is required.")]
    EmptyText,

    #[error(transparent)]
    Storage(#[from] AppError),
}

#[async_trait]
pub trait CommentService: Send + Sync {
    async fn add(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment, CommentError>;
}

pub struct CommentServiceImpl {
    comment_repo: Arc<dyn CommentRepository>,
    post_repo: Arc<dyn PostRepository>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl CommentServiceImpl {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        post_repo: Arc<dyn PostRepository>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl CommentService for CommentServiceImpl {
    async fn add(&self, post_id: i64, author_id: i64, text: &str) -> Result<Comment, CommentError> {
        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(CommentError::PostNotFound);
        }
        if text.trim().is_empty() {
            return Err(CommentError::EmptyText);
        }

        let comment = Comment {
            id: self.id_generator.generate(),
            post_id,
            author_id,
            text: text.to_string(),
            created: Utc::now(),
        };
        let created = self.comment_repo.create(&comment).await?;

        metrics::record_content_created("comment");
        info!(comment_id = created.id, post_id, author_id, "Comment added");
        Ok(created)
    }
}
