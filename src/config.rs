//! Configuration Module
//!
//! Handles loading and validating server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Default Logseq HTTP API endpoint.
pub const DEFAULT_API_URL: &str = "http://localhost:12315";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Logseq HTTP API
    pub api_url: String,
    /// Bearer token passed through to the Logseq API
    pub token: Option<String>,
    /// Local graph directory; enables file metadata enrichment when set
    pub graph_path: Option<PathBuf>,
    /// Resource cache TTL in seconds
    pub cache_ttl: u64,
    /// Batch size reserved for remote client batching
    pub max_batch_size: usize,
    /// Remote request timeout in seconds
    pub request_timeout: u64,
    /// Number of entries in the most-linked pages ranking
    pub max_linked_pages: usize,
    /// Page names listed per namespace in the structure summary
    pub max_pages_per_namespace: usize,
    /// Orphaned page names listed in the structure summary
    pub max_orphaned_pages: usize,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LOGSEQ_API_URL` - Logseq API URL (default: http://localhost:12315)
    /// - `LOGSEQ_TOKEN` - API bearer token (default: none)
    /// - `LOGSEQ_GRAPH_PATH` - Local graph directory (default: none)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 300)
    /// - `MAX_BATCH_SIZE` - Remote batch size (default: 50)
    /// - `REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `MAX_LINKED_PAGES` - Most linked pages listed (default: 10)
    /// - `MAX_PAGES_PER_NAMESPACE` - Pages listed per namespace (default: 50)
    /// - `MAX_ORPHANED_PAGES` - Orphaned pages listed (default: 50)
    /// - `SERVER_PORT` - HTTP server port (default: 8765)
    ///
    /// Fails if `LOGSEQ_GRAPH_PATH` is set but does not exist.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            api_url: env::var("LOGSEQ_API_URL").unwrap_or(defaults.api_url),
            token: non_empty_var("LOGSEQ_TOKEN"),
            graph_path: non_empty_var("LOGSEQ_GRAPH_PATH").map(PathBuf::from),
            cache_ttl: parse_var("CACHE_TTL", defaults.cache_ttl),
            max_batch_size: parse_var("MAX_BATCH_SIZE", defaults.max_batch_size),
            request_timeout: parse_var("REQUEST_TIMEOUT", defaults.request_timeout),
            max_linked_pages: parse_var("MAX_LINKED_PAGES", defaults.max_linked_pages),
            max_pages_per_namespace: parse_var(
                "MAX_PAGES_PER_NAMESPACE",
                defaults.max_pages_per_namespace,
            ),
            max_orphaned_pages: parse_var("MAX_ORPHANED_PAGES", defaults.max_orphaned_pages),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks that a configured graph path exists on disk.
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.graph_path {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "LOGSEQ_GRAPH_PATH does not exist: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            graph_path: None,
            cache_ttl: 300,
            max_batch_size: 50,
            request_timeout: 30,
            max_linked_pages: 10,
            max_pages_per_namespace: 50,
            max_orphaned_pages: 50,
            server_port: 8765,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
