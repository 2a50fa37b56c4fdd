//! Recent pages and journals (`logseq://pages/recent`, `logseq://journal/recent`)

use std::path::Path;

use chrono::{Duration, Local, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::client::GraphApi;
use crate::config::Config;
use crate::error::Result;
use crate::filesystem::{resolve_page_path, run_blocking, stat_file};
use crate::models::Page;

/// A page enriched with its file's modification stamp.
#[derive(Debug, Clone, Serialize)]
pub struct PageWithFile {
    #[serde(flatten)]
    pub page: Page,
    pub file_path: String,
    pub modified_time: f64,
    pub modified_date: Option<String>,
    pub size_mb: f64,
}

/// Pages as returned: with file stamps when a graph directory is configured,
/// otherwise as Logseq reported them.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RecentPages {
    WithFiles(Vec<PageWithFile>),
    Plain(Vec<Page>),
}

/// Attaches file metadata; `None` if the page has no file on disk.
pub fn with_file_metadata(page: Page, graph_root: &Path) -> Option<PageWithFile> {
    let path = resolve_page_path(&page.name, Some(graph_root))?;
    let meta = stat_file(&path);
    if !meta.exists {
        return None;
    }
    Some(PageWithFile {
        page,
        file_path: path.display().to_string(),
        modified_time: meta.modified_time,
        modified_date: meta.modified_date,
        size_mb: meta.size_mb,
    })
}

fn sort_newest_first(pages: &mut [PageWithFile]) {
    pages.sort_by(|a, b| b.modified_time.total_cmp(&a.modified_time));
}

// == Recent Pages ==
/// Pages with files on disk, most recently modified first, at most `limit`.
pub fn pages_by_modification(
    pages: Vec<Page>,
    graph_root: &Path,
    limit: usize,
) -> Vec<PageWithFile> {
    let mut stamped: Vec<PageWithFile> = pages
        .into_iter()
        .filter_map(|page| with_file_metadata(page, graph_root))
        .collect();
    sort_newest_first(&mut stamped);
    stamped.truncate(limit);
    stamped
}

pub async fn fetch_recent_pages(
    client: &dyn GraphApi,
    config: &Config,
    limit: usize,
) -> Result<RecentPages> {
    let pages = client.all_pages().await?;

    match config.graph_path.clone() {
        Some(root) => {
            let stamped = run_blocking(move || pages_by_modification(pages, &root, limit)).await?;
            Ok(RecentPages::WithFiles(stamped))
        }
        None => {
            warn!("LOGSEQ_GRAPH_PATH not configured, returning pages without timestamps");
            Ok(RecentPages::Plain(pages.into_iter().take(limit).collect()))
        }
    }
}

// == Recent Journals ==
/// Journal pages whose files were modified at or after `cutoff` (Unix
/// seconds), newest first.
pub fn journals_modified_since(
    journals: Vec<Page>,
    graph_root: &Path,
    cutoff: f64,
) -> Vec<PageWithFile> {
    let mut recent: Vec<PageWithFile> = journals
        .into_iter()
        .filter_map(|page| with_file_metadata(page, graph_root))
        .filter(|page| page.modified_time >= cutoff)
        .collect();
    sort_newest_first(&mut recent);
    recent
}

/// Journal pages whose `journalDay` falls within `days` of `now`, highest
/// `journalDay` first. Pages without a parseable day are skipped.
pub fn journals_by_day(journals: Vec<Page>, days: i64, now: NaiveDateTime) -> Vec<Page> {
    let cutoff = now - Duration::days(days);
    let mut recent: Vec<Page> = journals
        .into_iter()
        .filter(|page| {
            page.journal_day
                .as_ref()
                .and_then(|day| day.to_date())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .is_some_and(|start| start >= cutoff)
        })
        .collect();
    recent.sort_by_key(|page| std::cmp::Reverse(page.journal_day_key()));
    recent
}

pub async fn fetch_recent_journals(
    client: &dyn GraphApi,
    config: &Config,
    days: i64,
) -> Result<RecentPages> {
    let journals: Vec<Page> = client
        .all_pages()
        .await?
        .into_iter()
        .filter(|page| page.journal)
        .collect();

    match config.graph_path.clone() {
        Some(root) => {
            let now = Utc::now().timestamp_millis() as f64 / 1000.0;
            let cutoff = now - (days * 86_400) as f64;
            let recent =
                run_blocking(move || journals_modified_since(journals, &root, cutoff)).await?;
            Ok(RecentPages::WithFiles(recent))
        }
        None => Ok(RecentPages::Plain(journals_by_day(
            journals,
            days,
            Local::now().naive_local(),
        ))),
    }
}
