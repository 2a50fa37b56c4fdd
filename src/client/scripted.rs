//! In-memory `GraphApi` with canned responses for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;
use serde_json::{json, Map, Value};

use crate::client::GraphApi;
use crate::error::{Error, Result};
use crate::models::{Block, Page};

#[derive(Default)]
pub(crate) struct ScriptedGraph {
    pub graph: Value,
    pub pages: Vec<Page>,
    pub blocks: HashMap<String, Vec<Block>>,
    pub references: HashMap<String, Vec<Value>>,
    pub search_results: Vec<Block>,
    /// Pages whose reference lookup fails
    pub failing_pages: HashSet<String>,
    /// Holds `all_pages` until released
    pub all_pages_gate: Option<Arc<Gate>>,
    calls: Mutex<Vec<String>>,
}

/// Pauses a call: `entered` fires once the call is waiting, `release` lets
/// it finish.
#[derive(Default)]
pub(crate) struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl ScriptedGraph {
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|call| *call == method).count()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }
}

#[async_trait]
impl GraphApi for ScriptedGraph {
    async fn current_graph(&self) -> Result<Value> {
        self.record("current_graph");
        Ok(self.graph.clone())
    }

    async fn all_pages(&self) -> Result<Vec<Page>> {
        self.record("all_pages");
        if let Some(gate) = &self.all_pages_gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        Ok(self.pages.clone())
    }

    async fn page(&self, name: &str) -> Result<Option<Page>> {
        self.record("page");
        Ok(self.pages.iter().find(|page| page.name == name).cloned())
    }

    async fn page_blocks(&self, name: &str) -> Result<Vec<Block>> {
        self.record("page_blocks");
        Ok(self.blocks.get(name).cloned().unwrap_or_default())
    }

    async fn search_blocks(&self, _query: &str) -> Result<Vec<Block>> {
        self.record("search_blocks");
        Ok(self.search_results.clone())
    }

    async fn page_linked_references(&self, name: &str) -> Result<Vec<Value>> {
        self.record("page_linked_references");
        if self.failing_pages.contains(name) {
            return Err(Error::Api {
                method: "logseq.Editor.getPageLinkedReferences".to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(self.references.get(name).cloned().unwrap_or_default())
    }

    async fn create_page(
        &self,
        name: &str,
        _properties: Option<Map<String, Value>>,
    ) -> Result<Value> {
        self.record("create_page");
        Ok(json!({ "name": name }))
    }

    async fn create_block(
        &self,
        page: &str,
        content: &str,
        _properties: Option<Map<String, Value>>,
    ) -> Result<Value> {
        self.record("create_block");
        Ok(json!({ "page": page, "content": content }))
    }

    async fn update_block(
        &self,
        uuid: &str,
        content: &str,
        _properties: Option<Map<String, Value>>,
    ) -> Result<Value> {
        self.record("update_block");
        Ok(json!({ "uuid": uuid, "content": content }))
    }

    async fn block(&self, uuid: &str) -> Result<Option<Block>> {
        self.record("block");
        Ok(self
            .blocks
            .values()
            .flatten()
            .find(|block| block.uuid.as_deref() == Some(uuid))
            .cloned())
    }

    async fn insert_block(
        &self,
        parent: &str,
        content: &str,
        _properties: Option<Map<String, Value>>,
        before: bool,
    ) -> Result<Value> {
        self.record("insert_block");
        Ok(json!({ "parent": parent, "content": content, "before": before }))
    }

    async fn move_block(&self, uuid: &str, target: &str, as_child: bool) -> Result<Value> {
        self.record("move_block");
        Ok(json!({ "uuid": uuid, "target": target, "as_child": as_child }))
    }

    async fn remove_block(&self, _uuid: &str) -> Result<Value> {
        self.record("remove_block");
        Ok(Value::Null)
    }

    async fn delete_page(&self, _name: &str) -> Result<Value> {
        self.record("delete_page");
        Ok(Value::Null)
    }
}
