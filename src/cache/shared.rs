//! Shared Cache Module
//!
//! `TtlCache` behind async locks, safe to share between request tasks.
//! Fetches are single-flight per key: concurrent misses on one key wait for
//! the fetch in flight, while other keys and cache control stay available.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::{CacheStats, TtlCache};

// == Shared Cache ==
#[derive(Debug)]
pub struct SharedCache<V> {
    /// Entries; locked only for lookups and stores, never across a fetch
    cache: Mutex<TtlCache<V>>,
    /// One fetch lock per key
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Bumped on every invalidation
    epoch: AtomicU64,
}

impl<V: Clone> SharedCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::wrap(TtlCache::new(ttl))
    }

    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self::wrap(TtlCache::with_ttl_secs(ttl_secs))
    }

    fn wrap(cache: TtlCache<V>) -> Self {
        Self {
            cache: Mutex::new(cache),
            inflight: Mutex::new(HashMap::new()),
            epoch: AtomicU64::new(0),
        }
    }

    async fn flight_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut inflight = self.inflight.lock().await;
        inflight.entry(key.to_string()).or_default().clone()
    }

    // == Get Or Fetch ==
    /// Returns the cached value for `key`, or awaits `fetch` once and stores
    /// its result.
    ///
    /// Errors from `fetch` propagate unchanged and nothing is stored. A
    /// result whose fetch overlapped an invalidation is returned but not
    /// stored, so it cannot outlive the write that triggered the
    /// invalidation.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let flight = self.flight_lock(key).await;
        let _in_flight = flight.lock().await;

        if let Some(value) = self.cache.lock().await.get(key) {
            return Ok(value);
        }

        let epoch = self.epoch.load(Ordering::Acquire);
        let value = fetch().await?;

        let mut cache = self.cache.lock().await;
        if self.epoch.load(Ordering::Acquire) == epoch {
            cache.insert(key, value.clone());
        } else {
            debug!(key, "cache invalidated during fetch, result not stored");
        }
        Ok(value)
    }

    // == Cache Control ==
    /// Removes the entry under `key`, or every entry when `key` is `None`.
    pub async fn invalidate(&self, key: Option<&str>) -> usize {
        let mut cache = self.cache.lock().await;
        self.epoch.fetch_add(1, Ordering::AcqRel);
        cache.invalidate(key)
    }

    pub async fn is_cached(&self, key: &str) -> bool {
        self.cache.lock().await.is_cached(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.lock().await.stats()
    }

    pub async fn ttl(&self) -> Duration {
        self.cache.lock().await.ttl()
    }
}
