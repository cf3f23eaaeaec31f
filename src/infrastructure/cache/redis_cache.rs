//! Redis Page Cache
//!
//! Pages are stored as JSON strings under `<prefix><route>` with `SETEX`, so
//! Redis handles expiry. Several server processes can share one cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, instrument, warn};

use super::page_cache::{CachedPage, PageCache};
use crate::shared::error::AppError;

#[derive(Clone)]
pub struct RedisPageCache {
    conn: ConnectionManager,
    prefix: Arc<str>,
}

impl RedisPageCache {
    pub fn new(conn: ConnectionManager, prefix: impl Into<Arc<str>>) -> Self {
        Self {
            conn,
            prefix: prefix.into(),
        }
    }

    fn format_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl PageCache for RedisPageCache {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<CachedPage>, AppError> {
        let full_key = self.format_key(key);
        let mut conn = self.conn.clone();

        let data: Option<String> = conn.get(&full_key).await?;
        match data {
            Some(data) => {
                debug!(key = %full_key, "Page cache hit");
                let page = serde_json::from_str(&data).map_err(|e| {
                    warn!("Page cache deserialization error: {}", e);
                    AppError::Internal(format!("Page cache deserialization failed: {}", e))
                })?;
                Ok(Some(page))
            }
            None => {
                debug!(key = %full_key, "Page cache miss");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, page), level = "debug")]
    async fn put(&self, key: &str, page: &CachedPage, ttl: Duration) -> Result<(), AppError> {
        let full_key = self.format_key(key);
        let data = serde_json::to_string(page)
            .map_err(|e| AppError::Internal(format!("Page cache serialization failed: {}", e)))?;
        let mut conn = self.conn.clone();

        // SETEX rejects a zero expiry.
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(&full_key, data, seconds).await?;
        debug!(key = %full_key, ttl = seconds, "Page cached");

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(format!("{}*", self.prefix)).await?;
        if keys.is_empty() {
            return Ok(());
        }

        let deleted: u64 = conn.del(&keys).await?;
        debug!(deleted = deleted, "Page cache cleared");
        Ok(())
    }
}
