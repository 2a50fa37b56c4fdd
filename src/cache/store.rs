//! TTL Cache Module
//!
//! Key→value storage with a fixed, uniform expiry.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// In-memory cache whose entries all share one TTL.
///
/// There is no internal locking; `SharedCache` wraps it for use across
/// tasks.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Lifetime of every entry
    ttl: Duration,
    /// Hit/miss counters
    stats: CacheStats,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            stats: CacheStats::new(),
        }
    }

    /// Creates an empty cache with a TTL given in seconds.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self::new(Duration::from_secs(ttl_secs))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Get ==
    /// Returns a clone of the value under `key` if it has not expired.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh_at(now, self.ttl) => {
                self.stats.record_hit();
                debug!(key, age_ms = entry.age().as_millis() as u64, "cache hit");
                Some(entry.value.clone())
            }
            _ => {
                self.stats.record_miss();
                debug!(key, "cache miss");
                None
            }
        }
    }

    // == Insert ==
    /// Stores `value` under `key`, stamped with the current instant.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.entries.insert(key.into(), CacheEntry::new(value));
    }

    // == Invalidate ==
    /// Removes the entry under `key`, or every entry when `key` is `None`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&mut self, key: Option<&str>) -> usize {
        match key {
            Some(key) => usize::from(self.entries.remove(key).is_some()),
            None => {
                let count = self.entries.len();
                self.entries.clear();
                count
            }
        }
    }

    // == Is Cached ==
    /// True iff an entry exists under `key` and has not expired.
    ///
    /// Does not count as a lookup and does not refresh the entry.
    pub fn is_cached(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(self.ttl))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}
