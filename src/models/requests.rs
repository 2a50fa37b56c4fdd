//! Request DTOs for the context server API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Query string for block search (GET /tools/search)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Logseq query, e.g. `property:template` or `"search term"`
    #[serde(default)]
    pub query: String,
}

impl SearchQuery {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        None
    }
}

/// Request body for page creation (POST /tools/pages)
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePageRequest {
    /// Page name; journal pages use the "Mmm dth, yyyy" form
    pub name: String,
    /// Optional page properties
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl CreatePageRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Page name cannot be empty".to_string());
        }
        None
    }
}

/// Request body for appending a block to a page (POST /tools/blocks)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBlockRequest {
    /// Page to append to
    pub page: String,
    /// Block content; `[[Page Name]]` creates a link
    pub content: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl CreateBlockRequest {
    pub fn validate(&self) -> Option<String> {
        if self.page.trim().is_empty() {
            return Some("Page name cannot be empty".to_string());
        }
        None
    }
}

/// Request body for editing a block (PUT /tools/blocks/:uuid)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBlockRequest {
    /// New block content
    pub content: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// Request body for adding a child block (POST /tools/blocks/:uuid/children)
#[derive(Debug, Clone, Deserialize)]
pub struct InsertBlockRequest {
    pub content: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    /// Insert as the first child instead of the last
    #[serde(default)]
    pub before: bool,
}

/// Request body for moving a block (POST /tools/blocks/:uuid/move)
#[derive(Debug, Clone, Deserialize)]
pub struct MoveBlockRequest {
    /// Block to move next to, or under
    pub target: String,
    /// Become a child of `target` rather than its next sibling
    #[serde(default)]
    pub as_child: bool,
}

impl MoveBlockRequest {
    pub fn validate(&self) -> Option<String> {
        if self.target.trim().is_empty() {
            return Some("Target block cannot be empty".to_string());
        }
        None
    }
}
