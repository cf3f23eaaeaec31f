//! Feed Service
//!
//! Paginated post lists: the main feed, a group, an author's profile and the
//! authors a user follows. All feeds are newest first.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    FeedScope, FollowRepository, Group, GroupRepository, Page, PageError, Paginator, PostCard,
    PostRepository, User, UserRepository,
};
use crate::shared::error::AppError;

/// An author's profile with one page of their posts.
#[derive(Debug, Clone)]
pub struct ProfileFeed {
    pub author: User,
    pub page: Page<PostCard>,
    /// Whether the viewing user follows this author.
    pub following: bool,
    pub followers: u64,
    pub follows: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Group not found")]
    GroupNotFound,

    #[error("User not found")]
    AuthorNotFound,

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Storage(#[from] AppError),
}

#[async_trait]
pub trait FeedService: Send + Sync {
    /// One page of posts in `scope`.
    async fn page(&self, scope: FeedScope, number: u32) -> Result<Page<PostCard>, FeedError>;

    async fn group(&self, slug: &str, number: u32)
        -> Result<(Group, Page<PostCard>), FeedError>;

    async fn profile(
        &self,
        username: &str,
        number: u32,
        viewer_id: Option<i64>,
    ) -> Result<ProfileFeed, FeedError>;
}

pub struct FeedServiceImpl {
    post_repo: Arc<dyn PostRepository>,
    group_repo: Arc<dyn GroupRepository>,
    user_repo: Arc<dyn UserRepository>,
    follow_repo: Arc<dyn FollowRepository>,
    page_size: u32,
}

impl FeedServiceImpl {
    pub fn new(
        post_repo: Arc<dyn PostRepository>,
        group_repo: Arc<dyn GroupRepository>,
        user_repo: Arc<dyn UserRepository>,
        follow_repo: Arc<dyn FollowRepository>,
        page_size: u32,
    ) -> Self {
        Self {
            post_repo,
            group_repo,
            user_repo,
            follow_repo,
            page_size,
        }
    }
}

#[async_trait]
impl FeedService for FeedServiceImpl {
    async fn page(&self, scope: FeedScope, number: u32) -> Result<Page<PostCard>, FeedError> {
        let total = self.post_repo.count(scope).await?;
        let window = Paginator::new(total, self.page_size).page(number)?;

        let items = if window.len == 0 {
            Vec::new()
        } else {
            self.post_repo
                .list(scope, window.len, window.offset)
                .await?
        };

        Ok(Page { items, window })
    }

    async fn group(
        &self,
        slug: &str,
        number: u32,
    ) -> Result<(Group, Page<PostCard>), FeedError> {
        let group = self
            .group_repo
            .find_by_slug(slug)
            .await?
            .ok_or(FeedError::GroupNotFound)?;
        let page = self.page(FeedScope::Group(group.id), number).await?;
        Ok((group, page))
    }

    async fn profile(
        &self,
        username: &str,
        number: u32,
        viewer_id: Option<i64>,
    ) -> Result<ProfileFeed, FeedError> {
        let author = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(FeedError::AuthorNotFound)?;
        let page = self.page(FeedScope::Author(author.id), number).await?;

        let following = match viewer_id {
            Some(viewer_id) if viewer_id != author.id => {
                self.follow_repo.exists(viewer_id, author.id).await?
            }
            _ => false,
        };
        let followers = self.follow_repo.count_followers(author.id).await?;
        let follows = self.follow_repo.count_following(author.id).await?;

        Ok(ProfileFeed {
            author,
            page,
            following,
            followers,
            follows,
        })
    }
}
