//! Resources Module
//!
//! Read-only context documents about the graph. Each resource is fetched
//! from the Logseq API (and the local graph directory when configured),
//! then memoized in the shared TTL cache under a fixed key.

pub mod graph_info;
pub mod recent;
pub mod structure;
pub mod templates;

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheStats, ResourceCache};
use crate::client::GraphApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::ResourceDescriptor;

pub use graph_info::{FileStats, GraphInfo};
pub use recent::{PageWithFile, RecentPages};
pub use structure::{GraphStructure, SkippedPage, StructureLimits};
pub use templates::Template;

// == Cache Keys ==
pub const GRAPH_INFO_KEY: &str = "graph_info";
pub const TEMPLATES_KEY: &str = "templates";
pub const GRAPH_STRUCTURE_KEY: &str = "graph_structure";

pub const RECENT_PAGES_LIMIT: usize = 20;
pub const RECENT_JOURNAL_DAYS: i64 = 7;

pub fn recent_pages_key(limit: usize) -> String {
    format!("recent_pages_{}", limit)
}

pub fn recent_journals_key(days: i64) -> String {
    format!("recent_journals_{}", days)
}

/// Every resource this server publishes.
pub const RESOURCE_DESCRIPTORS: [ResourceDescriptor; 5] = [
    ResourceDescriptor {
        uri: "logseq://graph/info",
        path: "/resources/graph/info",
        description: "Current graph metadata and file statistics",
    },
    ResourceDescriptor {
        uri: "logseq://pages/recent",
        path: "/resources/pages/recent",
        description: "Recently modified pages",
    },
    ResourceDescriptor {
        uri: "logseq://journal/recent",
        path: "/resources/journal/recent",
        description: "Journal entries from the last 7 days",
    },
    ResourceDescriptor {
        uri: "logseq://templates/list",
        path: "/resources/templates/list",
        description: "Page and block templates",
    },
    ResourceDescriptor {
        uri: "logseq://graph/structure",
        path: "/resources/graph/structure",
        description: "Namespace hierarchy, orphaned pages and most linked pages",
    },
];

// == Resources ==
/// Remote client, shared cache and configuration, bundled for handlers.
#[derive(Clone)]
pub struct Resources {
    client: Arc<dyn GraphApi>,
    cache: Arc<ResourceCache>,
    config: Arc<Config>,
}

impl Resources {
    pub fn new(
        client: Arc<dyn GraphApi>,
        cache: Arc<ResourceCache>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            client,
            cache,
            config,
        }
    }

    /// Builds resources with a fresh cache using the configured TTL.
    pub fn from_config(client: Arc<dyn GraphApi>, config: Config) -> Self {
        let cache = ResourceCache::with_ttl_secs(config.cache_ttl);
        Self::new(client, Arc::new(cache), Arc::new(config))
    }

    pub fn client(&self) -> &dyn GraphApi {
        self.client.as_ref()
    }

    /// Serves `key` from the cache or runs `fetch` and stores its JSON form.
    ///
    /// Concurrent misses on the same key share one fetch.
    async fn cached<T, F, Fut>(&self, key: &str, fetch: F) -> Result<Value>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.cache
            .get_or_fetch(key, || async move {
                let resource = fetch().await?;
                Ok::<Value, Error>(serde_json::to_value(resource)?)
            })
            .await
    }

    // == Resource Accessors ==
    pub async fn graph_info(&self) -> Result<Value> {
        self.cached(GRAPH_INFO_KEY, || {
            graph_info::fetch_graph_info(self.client(), &self.config)
        })
        .await
    }

    pub async fn recent_pages(&self) -> Result<Value> {
        self.cached(&recent_pages_key(RECENT_PAGES_LIMIT), || {
            recent::fetch_recent_pages(self.client(), &self.config, RECENT_PAGES_LIMIT)
        })
        .await
    }

    pub async fn recent_journals(&self) -> Result<Value> {
        self.cached(&recent_journals_key(RECENT_JOURNAL_DAYS), || {
            recent::fetch_recent_journals(self.client(), &self.config, RECENT_JOURNAL_DAYS)
        })
        .await
    }

    pub async fn templates(&self) -> Result<Value> {
        self.cached(TEMPLATES_KEY, || templates::fetch_templates(self.client()))
            .await
    }

    pub async fn graph_structure(&self) -> Result<Value> {
        let limits = StructureLimits::from(self.config.as_ref());
        self.cached(GRAPH_STRUCTURE_KEY, || {
            structure::fetch_graph_structure(self.client(), limits)
        })
        .await
    }

    // == Cache Control ==
    /// Drops one cached resource, or all of them when `key` is `None`.
    pub async fn invalidate(&self, key: Option<&str>) -> usize {
        self.cache.invalidate(key).await
    }

    pub async fn is_cached(&self, key: &str) -> bool {
        self.cache.is_cached(key).await
    }

    pub async fn cache_stats(&self) -> (CacheStats, u64) {
        (self.cache.stats().await, self.cache.ttl().await.as_secs())
    }
}
