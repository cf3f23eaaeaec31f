//! # Domain Layer
//!
//! The domain layer contains the core business logic of the site.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, Group, Post, Comment, Follow)
//! - **value_objects**: Immutable value types (FeedScope, pagination)
//! - **services**: Domain services (access policy)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Repository traits define data access contracts
//! - Entities encapsulate domain behavior

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
pub use value_objects::*;
