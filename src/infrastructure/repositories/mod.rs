//! Repository Implementations
//!
//! PostgreSQL implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **PgUserRepository** - accounts
//! - **PgGroupRepository** - groups (lookups by slug)
//! - **PgPostRepository** - posts and feed queries
//! - **PgCommentRepository** - comments under posts
//! - **PgFollowRepository** - author subscriptions
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use yatube::infrastructure::repositories::{PgPostRepository, PgUserRepository};
//!
//! async fn setup_repositories(pool: PgPool) {
//!     let users = PgUserRepository::new(pool.clone());
//!     let posts = PgPostRepository::new(pool.clone());
//! }
//! ```

pub mod comment_repository;
pub mod follow_repository;
pub mod group_repository;
pub mod post_repository;
pub mod user_repository;

pub use comment_repository::PgCommentRepository;
pub use follow_repository::PgFollowRepository;
pub use group_repository::PgGroupRepository;
pub use post_repository::PgPostRepository;
pub use user_repository::PgUserRepository;

/// Whether a database error is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map_or(false, |e| e.is_unique_violation())
}
