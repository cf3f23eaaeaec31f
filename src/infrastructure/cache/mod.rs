//! Cache Module
//!
//! Page caching for the main feed, with a process-local and a Redis backend.
//!
//! ```text
//! +-------------------+
//! | page_cache layer  |
//! +-------------------+
//!          |
//!          v
//! +-------------------+
//! | PageCache trait   |
//! +-------------------+
//!      |         |
//!      v         v
//!  Memory      Redis
//! ```

mod page_cache;
mod redis_cache;

pub use page_cache::{CachedPage, MemoryPageCache, PageCache};
pub use redis_cache::RedisPageCache;

use redis::aio::ConnectionManager;
use redis::Client;
use tracing::{info, instrument};

use crate::config::RedisSettings;

/// Creates a Redis connection manager with automatic reconnection.
#[instrument(skip(settings))]
pub async fn create_redis_client(
    settings: &RedisSettings,
) -> Result<ConnectionManager, redis::RedisError> {
    info!("Connecting to Redis...");
    let client = Client::open(settings.url.as_str())?;
    let manager = ConnectionManager::new(client).await?;
    info!("Redis connection established");
    Ok(manager)
}

/// Cache key for a request path. The query string is not part of the key,
/// so every page of the main feed shares one entry per route.
pub fn route_key(path: &str) -> String {
    format!("page:{}", path)
}
