//! File metadata and graph directory discovery

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::Serialize;
use walkdir::WalkDir;

use crate::error::Result;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

// == File Metadata ==
/// Stat information for one graph file.
///
/// Times are seconds since the Unix epoch; dates are ISO 8601 in local time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FileMetadata {
    pub size: u64,
    pub size_mb: f64,
    pub modified_time: f64,
    pub created_time: f64,
    pub modified_date: Option<String>,
    pub created_date: Option<String>,
    pub exists: bool,
}

/// Stats `path`. Never fails: any I/O error yields a zeroed record with
/// `exists == false`.
pub fn stat_file(path: &Path) -> FileMetadata {
    let Ok(meta) = fs::metadata(path) else {
        return FileMetadata::default();
    };
    let Ok(modified) = meta.modified() else {
        return FileMetadata::default();
    };
    // Birth time is unavailable on some filesystems.
    let created = meta.created().unwrap_or(modified);

    FileMetadata {
        size: meta.len(),
        size_mb: bytes_to_mb(meta.len()),
        modified_time: unix_seconds(modified),
        created_time: unix_seconds(created),
        modified_date: Some(iso_date(modified)),
        created_date: Some(iso_date(created)),
        exists: true,
    }
}

/// Converts a byte count to megabytes rounded to 2 decimals.
pub fn bytes_to_mb(bytes: u64) -> f64 {
    round2(bytes as f64 / BYTES_PER_MB)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn unix_seconds(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn iso_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time).to_rfc3339()
}

// == Graph Directories ==
/// Standard directories of a graph; only those present on disk are set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GraphDirectories {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journals: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<PathBuf>,
    /// The `.logseq` metadata directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PathBuf>,
}

pub fn graph_directories(graph_root: &Path) -> GraphDirectories {
    let existing = |path: PathBuf| path.exists().then_some(path);
    GraphDirectories {
        root: existing(graph_root.to_path_buf()),
        pages: existing(graph_root.join("pages")),
        journals: existing(graph_root.join("journals")),
        assets: existing(graph_root.join("assets")),
        meta: existing(graph_root.join(".logseq")),
    }
}

// == Scanning ==
/// Regular files directly inside `dir` whose names end with `extension`,
/// sorted. Symlinks are followed; subdirectories are not entered. A missing
/// or unreadable directory yields no files.
pub fn list_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(extension))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Files with `extension` directly under `pages/` and `journals/`, in
/// lexicographic path order.
pub fn scan_graph_files(graph_root: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = ["pages", "journals"]
        .iter()
        .flat_map(|dir| list_files(&graph_root.join(dir), extension))
        .collect();
    files.sort();
    files
}

// == Blocking ==
/// Runs `scan` on tokio's blocking pool so file I/O stays off the async
/// workers.
pub async fn run_blocking<T, F>(scan: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(scan).await?)
}
