//! # Yatube
//!
//! A blogging and community site:
//! - Posts with optional group and image, newest first, paginated
//! - Group and author feeds, and a personal feed of followed authors
//! - Comments under posts
//! - Server-rendered HTML with a short-lived cache for the main feed
//! - PostgreSQL or in-memory storage, in-memory or Redis page cache
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, pagination, access rules and repository traits
//! - **Application Layer**: Business logic services and form DTOs
//! - **Infrastructure Layer**: Database, cache, media and metrics implementations
//! - **Presentation Layer**: HTTP handlers, middleware and HTML views
//!
//! ## Module Structure
//!
//! ```text
//! yatube/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities, value objects, and traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Storage, cache, media and metrics
//! +-- presentation/   HTTP routes, middleware and views
//! +-- shared/         Common utilities (errors, snowflake IDs, form errors)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers and views
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
