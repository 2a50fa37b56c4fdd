//! Remote Client Module
//!
//! The `GraphApi` trait is the seam between resource assembly and the
//! Logseq HTTP API. `LogseqClient` is the production implementation.

mod logseq;
#[cfg(test)]
pub(crate) mod scripted;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::Result;
use crate::models::{Block, Page};

pub use logseq::LogseqClient;

/// Read and write access to a Logseq graph.
#[async_trait]
pub trait GraphApi: Send + Sync {
    /// Descriptor of the currently open graph (name, path, ...).
    async fn current_graph(&self) -> Result<Value>;

    async fn all_pages(&self) -> Result<Vec<Page>>;

    /// Looks up a page by name; `None` if it does not exist.
    async fn page(&self, name: &str) -> Result<Option<Page>>;

    /// Block tree of a page. Top-level blocks carry their children.
    async fn page_blocks(&self, name: &str) -> Result<Vec<Block>>;

    async fn search_blocks(&self, query: &str) -> Result<Vec<Block>>;

    /// Incoming references to a page, one entry per referencing page.
    async fn page_linked_references(&self, name: &str) -> Result<Vec<Value>>;

    async fn create_page(&self, name: &str, properties: Option<Map<String, Value>>)
        -> Result<Value>;

    async fn create_block(
        &self,
        page: &str,
        content: &str,
        properties: Option<Map<String, Value>>,
    ) -> Result<Value>;

    async fn update_block(
        &self,
        uuid: &str,
        content: &str,
        properties: Option<Map<String, Value>>,
    ) -> Result<Value>;

    /// Looks up a block by uuid; `None` if it does not exist.
    async fn block(&self, uuid: &str) -> Result<Option<Block>>;

    /// Adds a child block under `parent`, first when `before` is set, last
    /// otherwise.
    async fn insert_block(
        &self,
        parent: &str,
        content: &str,
        properties: Option<Map<String, Value>>,
        before: bool,
    ) -> Result<Value>;

    /// Moves a block with its children next to `target`, or under it when
    /// `as_child` is set.
    async fn move_block(&self, uuid: &str, target: &str, as_child: bool) -> Result<Value>;

    /// Removes a block and its children.
    async fn remove_block(&self, uuid: &str) -> Result<Value>;

    /// Removes a page and all of its blocks.
    async fn delete_page(&self, name: &str) -> Result<Value>;
}
