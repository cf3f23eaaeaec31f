//! # Domain Entities
//!
//! Core domain entities representing the main business objects of the site.
//! All entities map directly to their corresponding database tables.
//!
//! - **User**: account with credentials and profile names
//! - **Group**: topical community a post can be filed under
//! - **Post**: text with optional image, written by a user
//! - **Comment**: reply attached to a post
//! - **Follow**: a reader subscribed to an author
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer (Postgres and
//! in-memory backends).

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{Comment, CommentRepository, CommentWithAuthor};
pub use follow::{Follow, FollowRepository};
pub use group::{is_valid_slug, Group, GroupRepository};
pub use post::{AuthorRef, Post, PostCard, PostRepository};
pub use user::{is_valid_username, SessionUser, User, UserRepository};
