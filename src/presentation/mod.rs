//! Presentation Layer
//!
//! HTTP routes, handlers, HTML views and middleware.

pub mod http;
pub mod middleware;
