//! Page name → file path resolution

use std::path::{Path, PathBuf};

use crate::filesystem::journal::{is_journal_page_name, journal_file_for_name};

/// Separator Logseq writes in place of `/` in namespaced file names.
pub const NAMESPACE_FILE_SEPARATOR: &str = "___";

const ILLEGAL_FILE_CHARS: [char; 7] = ['<', '>', ':', '"', '|', '?', '*'];

/// File stem Logseq uses for a page name.
pub fn safe_file_stem(page_name: &str) -> String {
    page_name
        .replace('/', NAMESPACE_FILE_SEPARATOR)
        .replace(&ILLEGAL_FILE_CHARS[..], "_")
}

/// Maps a page name to its markdown file inside `graph_root`.
///
/// Looks in `pages/`, then `journals/`, then tries the journal date
/// heuristics. Returns `None` when no root is configured, the root is
/// missing, or no file matches.
pub fn resolve_page_path(page_name: &str, graph_root: Option<&Path>) -> Option<PathBuf> {
    let root = graph_root.filter(|root| root.exists())?;
    let file_name = format!("{}.md", safe_file_stem(page_name));

    let page_path = root.join("pages").join(&file_name);
    if page_path.exists() {
        return Some(page_path);
    }

    let journal_path = root.join("journals").join(&file_name);
    if journal_path.exists() {
        return Some(journal_path);
    }

    if is_journal_page_name(page_name) {
        return journal_file_for_name(page_name, root);
    }

    None
}
