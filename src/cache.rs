//! TTL cache for fetched odds, keyed by sport.
//!
//! An explicit key -> (value, inserted_at) store with a
//! `get_or_compute` contract. Owned by the API layer; the engine
//! never sees it.

use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached value and when it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Concurrent TTL cache.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Get a fresh value for `key`, if one is cached.
    ///
    /// Expired entries are evicted on access.
    pub fn get(&self, key: &str) -> Option<V> {
        let fresh = {
            let entry = self.entries.get(key)?;
            if entry.inserted_at.elapsed() < self.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        };

        if fresh.is_none() {
            self.entries.remove(key);
            debug!(key = %key, "Cache entry expired");
        }
        fresh
    }

    /// Store a value for `key`, resetting its TTL.
    pub fn insert(&self, key: &str, value: V) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Return the cached value for `key`, computing and storing it on
    /// a miss. Errors from `compute` are propagated and nothing is
    /// cached.
    pub async fn get_or_compute<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            crate::metrics::inc_cache_hits();
            return Ok(value);
        }

        crate::metrics::inc_cache_misses();
        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop a single entry.
    pub fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Number of entries, including any not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("soccer", 7);

        assert_eq!(cache.get("soccer"), Some(7));
        assert_eq!(cache.get("tennis"), None);
    }

    #[test]
    fn expired_entries_are_evicted() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(0));
        cache.insert("soccer", 7);

        assert_eq!(cache.get("soccer"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn get_or_compute_computes_once_while_fresh() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let mut calls = 0u32;

        for _ in 0..3 {
            let value: Result<u32, std::convert::Infallible> = cache
                .get_or_compute("soccer", || {
                    calls += 1;
                    async { Ok(42) }
                })
                .await;
            assert_eq!(value.unwrap(), 42);
        }

        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn get_or_compute_does_not_cache_errors() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        let first: Result<u32, &str> = cache.get_or_compute("soccer", || async { Err("boom") }).await;
        assert!(first.is_err());
        assert!(cache.is_empty());

        let second: Result<u32, &str> = cache.get_or_compute("soccer", || async { Ok(9) }).await;
        assert_eq!(second.unwrap(), 9);
    }

    #[test]
    fn invalidate_removes_entry() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("soccer", 7);
        cache.invalidate("soccer");

        assert_eq!(cache.get("soccer"), None);
    }
}
