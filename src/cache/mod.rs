//! Cache Module
//!
//! In-memory TTL caching with fetch-on-miss semantics. `TtlCache` is the
//! plain store; `SharedCache` adds the locking for use across request tasks.

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub(crate) use entry::CacheEntry;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::TtlCache;

/// Cache holding rendered resource payloads, keyed by resource cache key.
pub type ResourceCache = SharedCache<serde_json::Value>;
