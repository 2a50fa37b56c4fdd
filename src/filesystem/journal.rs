//! Journal page names
//!
//! Logseq titles journal pages like "Dec 1st, 2024" but stores them as
//! `journals/2024_12_01.md`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Abbreviated month with optional ordinal: "Dec 1st, 2024", "jan 12, 2025".
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ABBREVIATED_JOURNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+\d{1,2}(st|nd|rd|th)?,\s+\d{4}$",
    )
    .unwrap()
});

/// Full month name without ordinal: "December 1, 2024".
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static FULL_JOURNAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}$",
    )
    .unwrap()
});

/// Day number followed by an ordinal suffix.
///
/// SAFETY: Pattern is a compile-time constant that is known to be valid.
#[allow(clippy::unwrap_used)]
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)(st|nd|rd|th)").unwrap());

/// Date formats tried, in order, once ordinals are stripped.
const JOURNAL_DATE_FORMATS: [&str; 2] = ["%b %d, %Y", "%B %d, %Y"];

/// True if `page_name` looks like a journal page title.
pub fn is_journal_page_name(page_name: &str) -> bool {
    ABBREVIATED_JOURNAL_RE.is_match(page_name) || FULL_JOURNAL_RE.is_match(page_name)
}

/// Removes ordinal suffixes from day numbers: "Dec 1st, 2024" → "Dec 1, 2024".
pub fn strip_ordinals(name: &str) -> String {
    ORDINAL_RE.replace_all(name, "$1").into_owned()
}

/// File name Logseq uses for a journal date, e.g. `2024_12_01.md`.
pub fn journal_file_name(date: NaiveDate) -> String {
    date.format("%Y_%m_%d.md").to_string()
}

/// Resolves a journal title to `graph_root/journals/YYYY_MM_DD.md`.
///
/// The first format that both parses and points at an existing file wins.
pub fn journal_file_for_name(journal_name: &str, graph_root: &Path) -> Option<PathBuf> {
    let cleaned = strip_ordinals(journal_name);
    let journals = graph_root.join("journals");

    JOURNAL_DATE_FORMATS.iter().find_map(|format| {
        let date = NaiveDate::parse_from_str(cleaned.trim(), format).ok()?;
        let path = journals.join(journal_file_name(date));
        path.is_file().then_some(path)
    })
}
