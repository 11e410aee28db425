//! A small in-process cache with a fixed time-to-live.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value cache whose entries expire `ttl` after insertion.
///
/// Uses `tokio::time::Instant`, so paused-clock tests can advance past the
/// TTL without sleeping.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a live entry.
    pub async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    /// Insert or replace an entry, dropping anything already expired.
    pub async fn insert(&self, key: K, value: V) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key,
            Entry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    #[cfg(test)]
    async fn stored(&self) -> usize {
        self.entries.read().await.len()
    }
}
