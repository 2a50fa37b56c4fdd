//! Graph overview resource (`logseq://graph/info`)

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::GraphApi;
use crate::config::Config;
use crate::error::Result;
use crate::filesystem::{
    bytes_to_mb, graph_directories, list_files, run_blocking, scan_graph_files, stat_file,
};

/// File counts and size of a local graph directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStats {
    pub page_count: usize,
    pub journal_count: usize,
    pub total_size_mb: f64,
    pub graph_path: String,
}

/// Current graph descriptor plus local file stats and server settings.
#[derive(Debug, Clone, Serialize)]
pub struct GraphInfo {
    /// Fields reported by Logseq for the open graph
    #[serde(flatten)]
    pub graph: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_stats: Option<FileStats>,
    pub api_url: String,
    pub cache_ttl: u64,
}

/// Counts `.md` files directly under `pages/` and `journals/` and sums
/// their sizes.
pub fn file_stats(graph_root: &Path) -> FileStats {
    let dirs = graph_directories(graph_root);
    let count_in = |dir: Option<&Path>| dir.map_or(0, |dir| list_files(dir, ".md").len());

    let total_bytes: u64 = scan_graph_files(graph_root, ".md")
        .iter()
        .map(|file| stat_file(file).size)
        .sum();

    FileStats {
        page_count: count_in(dirs.pages.as_deref()),
        journal_count: count_in(dirs.journals.as_deref()),
        total_size_mb: bytes_to_mb(total_bytes),
        graph_path: graph_root.display().to_string(),
    }
}

fn descriptor_fields(descriptor: Value) -> Map<String, Value> {
    match descriptor {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            let mut fields = Map::new();
            fields.insert("graph".to_string(), other);
            fields
        }
    }
}

pub async fn fetch_graph_info(client: &dyn GraphApi, config: &Config) -> Result<GraphInfo> {
    let graph = descriptor_fields(client.current_graph().await?);
    let file_stats = match config.graph_path.clone() {
        Some(root) => Some(run_blocking(move || file_stats(&root)).await?),
        None => None,
    };

    Ok(GraphInfo {
        graph,
        file_stats,
        api_url: config.api_url.clone(),
        cache_ttl: config.cache_ttl,
    })
}
