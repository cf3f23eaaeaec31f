//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL) and their in-memory counterparts
//! - Page cache (in-memory or Redis)
//! - Media storage for uploaded images
//! - Prometheus metrics

pub mod cache;
pub mod database;
pub mod media;
pub mod memory;
pub mod metrics;
pub mod repositories;
