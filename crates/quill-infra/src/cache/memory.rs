//! In-memory expiring store backing password reset tokens.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|exp| now <= exp)
    }
}

/// HashMap behind an async RwLock. Expired entries are dropped lazily on access
/// and swept on every write. Contents are lost on restart, which only voids
/// outstanding reset links.
#[derive(Default)]
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;
        store
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut store = self.store.write().await;
        store.retain(|_, entry| entry.is_live(now));
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: ttl.map(|d| now + d),
            },
        );
        Ok(())
    }

    async fn take(&self, key: &str) -> Option<String> {
        let mut store = self.store.write().await;
        store
            .remove(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value)
    }
}
