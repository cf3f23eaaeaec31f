//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! - **FeedScope**: which posts a feed is drawn from
//! - **Paginator / Page**: page-number pagination over a counted collection

mod feed_scope;
mod page;

pub use feed_scope::*;
pub use page::*;
