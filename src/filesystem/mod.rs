//! Filesystem Module
//!
//! Read-only helpers over a Logseq graph directory: page-path resolution,
//! journal title heuristics, file metadata and file scanning.

mod journal;
mod metadata;
mod resolve;

pub use journal::{is_journal_page_name, journal_file_for_name, strip_ordinals};
pub use metadata::{
    bytes_to_mb, graph_directories, list_files, round2, run_blocking, scan_graph_files,
    stat_file, FileMetadata, GraphDirectories,
};
pub use resolve::{resolve_page_path, safe_file_stem, NAMESPACE_FILE_SEPARATOR};
