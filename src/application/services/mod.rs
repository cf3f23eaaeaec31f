//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AuthService**: sign-up, password login, session tokens
//! - **PostService**: creating and editing posts, post detail
//! - **FeedService**: paginated feeds by scope
//! - **CommentService**: comments under posts
//! - **FollowService**: author subscriptions

pub mod auth_service;
pub mod comment_service;
pub mod feed_service;
pub mod follow_service;
pub mod post_service;

pub use auth_service::{AuthError, AuthService, AuthServiceImpl, Claims, SESSION_COOKIE};
pub use comment_service::{CommentError, CommentService, CommentServiceImpl};
pub use feed_service::{FeedError, FeedService, FeedServiceImpl, ProfileFeed};
pub use follow_service::{FollowError, FollowService, FollowServiceImpl};
pub use post_service::{PostDetail, PostDraft, PostError, PostService, PostServiceImpl};
