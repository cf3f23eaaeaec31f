//! Post Service
//!
//! Creating and editing posts, and assembling the post detail page.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, instrument};

use crate::application::dto::{ImageChange, ImageUpload};
use crate::domain::{
    CommentRepository, CommentWithAuthor, FeedScope, Group, GroupRepository, Post, PostCard,
    PostRepository,
};
use crate::infrastructure::media::MediaStore;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Validated input for creating or editing a post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<i64>,
    pub image: ImageChange,
}

/// Everything the post detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub card: PostCard,
    pub author_post_count: u64,
    pub comments: Vec<CommentWithAuthor>,
}

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,

    #[error("This field is required.")]
    EmptyText,

    #[error("Select a valid choice. That choice is not one of the available choices.")]
    UnknownGroup,

    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    InvalidImage,

    #[error("Only the author can edit this post")]
    NotAuthor,

    #[error(transparent)]
    Storage(#[from] AppError),
}

impl PostError {
    /// Form field an error belongs to, for errors shown next to inputs.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            PostError::EmptyText => Some("text"),
            PostError::UnknownGroup => Some("group"),
            PostError::InvalidImage => Some("image"),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PostService: Send + Sync {
    async fn create(&self, author_id: i64, draft: PostDraft) -> Result<Post, PostError>;

    /// Edit a post; only its author may do so.
    async fn update(&self, post_id: i64, editor_id: i64, draft: PostDraft)
        -> Result<Post, PostError>;

    async fn get(&self, post_id: i64) -> Result<Post, PostError>;

    async fn detail(&self, post_id: i64) -> Result<PostDetail, PostError>;

    /// Groups a post can be assigned to.
    async fn groups(&self) -> Result<Vec<Group>, PostError>;
}

pub struct PostServiceImpl {
    post_repo: Arc<dyn PostRepository>,
    group_repo: Arc<dyn GroupRepository>,
    comment_repo: Arc<dyn CommentRepository>,
    media: Arc<dyn MediaStore>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl PostServiceImpl {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        group_repo: Arc<dyn GroupRepository>,
        comment_repo: Arc<dyn CommentRepository>,
        media: Arc<dyn MediaStore>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            comment_repo,
            media,
            id_generator,
        }
    }

    async fn check_draft(&self, draft: &PostDraft) -> Result<(), PostError> {
        if draft.text.trim().is_empty() {
            return Err(PostError::EmptyText);
        }
        if let Some(group_id) = draft.group_id {
            if self.group_repo.find_by_id(group_id).await?.is_none() {
                return Err(PostError::UnknownGroup);
            }
        }
        if let ImageChange::Replace(upload) = &draft.image {
            if upload.format().is_none() {
                return Err(PostError::InvalidImage);
            }
        }
        Ok(())
    }

    async fn store_image(&self, upload: &ImageUpload) -> Result<String, PostError> {
        Ok(self.media.save(&upload.file_name, &upload.data).await?)
    }
}

#[async_trait]
impl PostService for PostServiceImpl {
    #[instrument(skip(self, draft))]
    async fn create(&self, author_id: i64, draft: PostDraft) -> Result<Post, PostError> {
        self.check_draft(&draft).await?;

        let image = match &draft.image {
            ImageChange::Replace(upload) => Some(self.store_image(upload).await?),
            ImageChange::Keep | ImageChange::Clear => None,
        };

        let post = Post {
            id: self.id_generator.generate(),
            text: draft.text,
            pub_date: Utc::now(),
            author_id,
            group_id: draft.group_id,
            image,
        };

        let created = self.post_repo.create(&post).await?;
        metrics::record_content_created("post");
        info!(post_id = created.id, author_id, "Post created");
        Ok(created)
    }

    #[instrument(skip(self, draft))]
    async fn update(
        &self,
        post_id: i64,
        editor_id: i64,
        draft: PostDraft,
    ) -> Result<Post, PostError> {
        let mut post = self.get(post_id).await?;
        if !post.is_author(editor_id) {
            return Err(PostError::NotAuthor);
        }
        self.check_draft(&draft).await?;

        post.image = match &draft.image {
            ImageChange::Keep => post.image,
            ImageChange::Clear => None,
            ImageChange::Replace(upload) => Some(self.store_image(upload).await?),
        };
        post.text = draft.text;
        post.group_id = draft.group_id;

        let updated = self.post_repo.update(&post).await?;
        info!(post_id, "Post updated");
        Ok(updated)
    }

    async fn get(&self, post_id: i64) -> Result<Post, PostError> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::NotFound)
    }

    async fn detail(&self, post_id: i64) -> Result<PostDetail, PostError> {
        let card = self
            .post_repo
            .find_card(post_id)
            .await?
            .ok_or(PostError::NotFound)?;
        let author_post_count = self
            .post_repo
            .count(FeedScope::Author(card.author.id))
            .await?;
        let comments = self.comment_repo.list_for_post(post_id).await?;

        Ok(PostDetail {
            card,
            author_post_count,
            comments,
        })
    }

    async fn groups(&self) -> Result<Vec<Group>, PostError> {
        Ok(self.group_repo.list_all().await?)
    }
}
