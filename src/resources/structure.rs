//! Graph structure analysis (`logseq://graph/structure`)
//!
//! Buckets pages by namespace, counts incoming references per page and
//! flags orphans: pages with no incoming references and no outgoing `[[`
//! links anywhere in their block tree.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::client::GraphApi;
use crate::config::Config;
use crate::error::Result;
use crate::models::Page;

/// Output caps for the structure summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureLimits {
    pub max_linked_pages: usize,
    pub max_pages_per_namespace: usize,
    pub max_orphaned_pages: usize,
}

impl From<&Config> for StructureLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_linked_pages: config.max_linked_pages,
            max_pages_per_namespace: config.max_pages_per_namespace,
            max_orphaned_pages: config.max_orphaned_pages,
        }
    }
}

// == Output ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamespaceSummary {
    pub page_count: usize,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrphanSummary {
    pub count: usize,
    pub pages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkedPage {
    pub page: String,
    pub link_count: usize,
}

/// A page the analysis could not inspect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPage {
    pub page: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStructure {
    pub total_pages: usize,
    pub journal_pages: usize,
    pub regular_pages: usize,
    pub namespaces: BTreeMap<String, NamespaceSummary>,
    pub root_pages: usize,
    pub orphaned_pages: OrphanSummary,
    pub most_linked_pages: Vec<LinkedPage>,
    pub skipped_pages: Vec<SkippedPage>,
}

// == Namespaces ==
/// Namespace of a page: everything before the last `/`.
pub fn namespace_of(page_name: &str) -> Option<&str> {
    page_name.rsplit_once('/').map(|(namespace, _)| namespace)
}

/// Page names grouped by namespace, in page order.
#[derive(Debug, Default, PartialEq)]
pub struct NamespaceIndex {
    pub namespaces: BTreeMap<String, Vec<String>>,
    /// Pages without a `/` in their name
    pub root: Vec<String>,
}

pub fn namespace_index(pages: &[Page]) -> NamespaceIndex {
    let mut index = NamespaceIndex::default();
    for page in pages {
        let bucket = match namespace_of(&page.name) {
            Some(namespace) => index.namespaces.entry(namespace.to_string()).or_default(),
            None => &mut index.root,
        };
        bucket.push(page.name.clone());
    }
    index
}

fn summarize_namespaces(
    namespaces: &BTreeMap<String, Vec<String>>,
    max_pages: usize,
) -> BTreeMap<String, NamespaceSummary> {
    namespaces
        .iter()
        .map(|(namespace, pages)| {
            let mut sorted = pages.clone();
            sorted.sort();
            sorted.truncate(max_pages);
            let summary = NamespaceSummary {
                page_count: pages.len(),
                pages: sorted,
            };
            (namespace.clone(), summary)
        })
        .collect()
}

// == Links ==
/// Per-page link findings, in page order.
#[derive(Debug, Default)]
pub struct LinkAnalysis {
    pub link_counts: Vec<(String, usize)>,
    pub orphans: Vec<String>,
    pub skipped: Vec<SkippedPage>,
}

/// Incoming reference count of a page and whether it is orphaned.
async fn inspect_page(client: &dyn GraphApi, page_name: &str) -> Result<(usize, bool)> {
    let link_count = client.page_linked_references(page_name).await?.len();
    if link_count > 0 {
        return Ok((link_count, false));
    }
    let blocks = client.page_blocks(page_name).await?;
    let has_outgoing = blocks.iter().any(|block| block.has_outgoing_link());
    Ok((0, !has_outgoing))
}

/// Inspects every page in turn. A page that fails is logged and recorded
/// as skipped; the rest of the graph is still analyzed.
pub async fn analyze_links(client: &dyn GraphApi, pages: &[Page]) -> LinkAnalysis {
    let mut analysis = LinkAnalysis::default();
    for page in pages {
        match inspect_page(client, &page.name).await {
            Ok((link_count, orphaned)) => {
                analysis.link_counts.push((page.name.clone(), link_count));
                if orphaned {
                    analysis.orphans.push(page.name.clone());
                }
            }
            Err(e) => {
                warn!("Error processing page '{}': {}", page.name, e);
                analysis.skipped.push(SkippedPage {
                    page: page.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    analysis
}

/// Top `limit` pages by incoming references. Ties keep page order.
pub fn most_linked(link_counts: &[(String, usize)], limit: usize) -> Vec<LinkedPage> {
    let mut ranked: Vec<&(String, usize)> = link_counts.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(page, link_count)| LinkedPage {
            page: page.clone(),
            link_count: *link_count,
        })
        .collect()
}

// == Summary ==
pub fn summarize(
    pages: &[Page],
    analysis: LinkAnalysis,
    limits: StructureLimits,
) -> GraphStructure {
    let index = namespace_index(pages);
    let journal_pages = pages.iter().filter(|page| page.journal).count();

    let mut orphans = analysis.orphans;
    let orphan_count = orphans.len();
    orphans.truncate(limits.max_orphaned_pages);

    GraphStructure {
        total_pages: pages.len(),
        journal_pages,
        regular_pages: pages.len() - journal_pages,
        namespaces: summarize_namespaces(&index.namespaces, limits.max_pages_per_namespace),
        root_pages: index.root.len(),
        orphaned_pages: OrphanSummary {
            count: orphan_count,
            pages: orphans,
        },
        most_linked_pages: most_linked(&analysis.link_counts, limits.max_linked_pages),
        skipped_pages: analysis.skipped,
    }
}

pub async fn fetch_graph_structure(
    client: &dyn GraphApi,
    limits: StructureLimits,
) -> Result<GraphStructure> {
    let pages = client.all_pages().await?;
    let analysis = analyze_links(client, &pages).await;
    Ok(summarize(&pages, analysis, limits))
}
