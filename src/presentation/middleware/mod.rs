//! Middleware
//!
//! Tower middleware for request processing.

pub mod logging;
pub mod metrics;
pub mod page_cache;
pub mod session;

pub use logging::create_trace_layer;
pub use metrics::track_metrics;
pub use page_cache::cache_page;
pub use session::load_session;
