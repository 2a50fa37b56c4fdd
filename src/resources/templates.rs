//! Template discovery (`logseq://templates/list`)

use serde::Serialize;
use serde_json::{Map, Value};

use crate::client::GraphApi;
use crate::error::Result;
use crate::models::Block;

/// Pages checked, in order, for a dedicated templates page.
pub const TEMPLATE_PAGE_NAMES: [&str; 4] = ["Templates", "templates", "Template", "template"];

/// Block search that finds blocks carrying a `template::` property.
pub const TEMPLATE_QUERY: &str = "property:template";

const TEMPLATE_NAME_MAX_CHARS: usize = 50;
const UNNAMED_TEMPLATE: &str = "Unnamed Template";
const UNKNOWN_PAGE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub name: String,
    pub id: Option<Value>,
    pub content: String,
    pub source_page: String,
    pub properties: Map<String, Value>,
}

impl Template {
    /// Template from a top-level block of a templates page, named by the
    /// first line of its content.
    pub fn from_page_block(block: &Block, page_name: &str) -> Self {
        let first_line = block.content.split('\n').next().unwrap_or_default();
        Self {
            name: first_line.chars().take(TEMPLATE_NAME_MAX_CHARS).collect(),
            id: block.id.clone(),
            content: block.content.clone(),
            source_page: page_name.to_string(),
            properties: block.properties.clone(),
        }
    }

    /// Template from a block found by property search, named by its
    /// `template` property.
    pub fn from_search_block(block: &Block) -> Self {
        let name = match block.properties.get("template") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) | None => UNNAMED_TEMPLATE.to_string(),
            Some(other) => other.to_string(),
        };
        let source_page = block
            .page
            .as_ref()
            .and_then(|page| page.name.clone())
            .unwrap_or_else(|| UNKNOWN_PAGE.to_string());

        Self {
            name,
            id: block.id.clone(),
            content: block.content.clone(),
            source_page,
            properties: block.properties.clone(),
        }
    }

    /// Same underlying block: equal ids when both have one, otherwise the
    /// same content on the same page.
    pub fn is_same_block(&self, other: &Template) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.source_page == other.source_page && self.content == other.content,
        }
    }
}

/// Top-level blocks of the first templates page that exists.
async fn templates_from_page(client: &dyn GraphApi) -> Result<Vec<Template>> {
    for page_name in TEMPLATE_PAGE_NAMES {
        if client.page(page_name).await?.is_none() {
            continue;
        }
        let blocks = client.page_blocks(page_name).await?;
        return Ok(blocks
            .iter()
            .filter(|block| block.is_top_level())
            .map(|block| Template::from_page_block(block, page_name))
            .collect());
    }
    Ok(Vec::new())
}

pub async fn fetch_templates(client: &dyn GraphApi) -> Result<Vec<Template>> {
    let mut templates = templates_from_page(client).await?;

    for block in client.search_blocks(TEMPLATE_QUERY).await? {
        let candidate = Template::from_search_block(&block);
        if !templates.iter().any(|t| t.is_same_block(&candidate)) {
            templates.push(candidate);
        }
    }

    Ok(templates)
}
