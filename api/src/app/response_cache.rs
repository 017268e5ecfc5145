//! Response cache
//!
//! Rendered feeds keyed by path and the parameters that shape them, replayed
//! until their TTL runs out. Failed aggregations are never stored. The number
//! of entries is bounded: expired entries go first, then the least recently
//! used one.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct CachedResponse {
    body: String,
    stored_at: Instant,
    last_accessed: Instant,
}

pub struct ResponseCache {
    ttl: Duration,
    max_entries: usize,
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    /// A zero `ttl` or a zero `max_entries` disables caching.
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero() && self.max_entries > 0
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)?;
        entry.last_accessed = Instant::now();
        Some(entry.body.clone())
    }

    /// Store `body`, evicting to stay within `max_entries`.
    pub async fn insert(&self, key: String, body: String) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.ttl);

        while entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let Some(lru) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            tracing::debug!("Evicting cached feed {}", lru);
            entries.remove(&lru);
        }

        let now = Instant::now();
        entries.insert(
            key,
            CachedResponse {
                body,
                stored_at: now,
                last_accessed: now,
            },
        );
    }

    #[cfg(test)]
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}
