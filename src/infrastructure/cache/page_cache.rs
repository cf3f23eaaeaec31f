//! Page Cache
//!
//! Stores fully rendered pages under a route key for a fixed time window.
//! The main feed is served from here while an entry is live, so a new post
//! only shows up on `/` after the entry expires or the cache is cleared.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::shared::error::AppError;

/// A rendered response body as it was first sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPage {
    pub content_type: String,
    pub body: String,
}

impl CachedPage {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            content_type: "text/html; charset=utf-8".to_string(),
            body: body.into(),
        }
    }
}

/// Key/value store for rendered pages with per-entry expiry.
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Returns the page stored under `key` if it has not expired.
    async fn get(&self, key: &str) -> Result<Option<CachedPage>, AppError>;

    /// Stores `page` under `key` for `ttl`, replacing any previous entry.
    async fn put(&self, key: &str, page: &CachedPage, ttl: Duration) -> Result<(), AppError>;

    /// Drops every entry.
    async fn clear(&self) -> Result<(), AppError>;
}

struct Entry {
    page: CachedPage,
    expires_at: Instant,
}

/// Process-local page cache.
#[derive(Default)]
pub struct MemoryPageCache {
    entries: DashMap<String, Entry>,
}

impl MemoryPageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl PageCache for MemoryPageCache {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<CachedPage>, AppError> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                debug!(key = %key, "Page cache hit");
                return Ok(Some(entry.page.clone()));
            }
        }
        // Expired entries are evicted lazily on read.
        self.entries.remove_if(key, |_, e| e.expires_at <= now);
        debug!(key = %key, "Page cache miss");
        Ok(None)
    }

    #[instrument(skip(self, page), level = "debug")]
    async fn put(&self, key: &str, page: &CachedPage, ttl: Duration) -> Result<(), AppError> {
        self.entries.insert(
            key.to_string(),
            Entry {
                page: page.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), AppError> {
        self.entries.clear();
        Ok(())
    }
}
