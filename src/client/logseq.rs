//! Logseq HTTP API client
//!
//! Every call is a `POST {api_url}/api` carrying `{"method", "args"}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::client::GraphApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Block, Page};

/// HTTP client for the Logseq local API.
#[derive(Debug, Clone)]
pub struct LogseqClient {
    http: Client,
    endpoint: String,
    token: Option<String>,
}

impl LogseqClient {
    /// Creates a client for `api_url` with the given request timeout.
    pub fn new(api_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("logseq_context/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/api", api_url.trim_end_matches('/')),
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.api_url,
            config.token.clone(),
            Duration::from_secs(config.request_timeout),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Invokes a Logseq API method and returns its raw JSON result.
    ///
    /// An empty response body is reported as `null`.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        debug!(method, "calling Logseq API");

        let mut request = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "method": method, "args": args }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Like `call`, decoding the result; `null` decodes to `T::default()`.
    async fn call_as<T>(&self, method: &str, args: Vec<Value>) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.call(method, args).await? {
            Value::Null => Ok(T::default()),
            value => Ok(serde_json::from_value(value)?),
        }
    }
}

fn properties_arg(properties: Option<Map<String, Value>>) -> Value {
    Value::Object(properties.unwrap_or_default())
}

#[async_trait]
impl GraphApi for LogseqClient {
    async fn current_graph(&self) -> Result<Value> {
        self.call("logseq.App.getCurrentGraph", vec![]).await
    }

    async fn all_pages(&self) -> Result<Vec<Page>> {
        self.call_as("logseq.Editor.getAllPages", vec![]).await
    }

    async fn page(&self, name: &str) -> Result<Option<Page>> {
        self.call_as("logseq.Editor.getPage", vec![json!(name)]).await
    }

    async fn page_blocks(&self, name: &str) -> Result<Vec<Block>> {
        self.call_as("logseq.Editor.getPageBlocksTree", vec![json!(name)])
            .await
    }

    async fn search_blocks(&self, query: &str) -> Result<Vec<Block>> {
        self.call_as("logseq.DB.q", vec![json!(query)]).await
    }

    async fn page_linked_references(&self, name: &str) -> Result<Vec<Value>> {
        self.call_as("logseq.Editor.getPageLinkedReferences", vec![json!(name)])
            .await
    }

    async fn create_page(
        &self,
        name: &str,
        properties: Option<Map<String, Value>>,
    ) -> Result<Value> {
        self.call(
            "logseq.Editor.createPage",
            vec![
                json!(name),
                properties_arg(properties),
                json!({ "redirect": false }),
            ],
        )
        .await
    }

    async fn create_block(
        &self,
        page: &str,
        content: &str,
        properties: Option<Map<String, Value>>,
    ) -> Result<Value> {
        self.call(
            "logseq.Editor.appendBlockInPage",
            vec![
                json!(page),
                json!(content),
                json!({ "properties": properties_arg(properties) }),
            ],
        )
        .await
    }

    async fn update_block(
        &self,
        uuid: &str,
        content: &str,
        properties: Option<Map<String, Value>>,
    ) -> Result<Value> {
        self.call(
            "logseq.Editor.updateBlock",
            vec![
                json!(uuid),
                json!(content),
                json!({ "properties": properties_arg(properties) }),
            ],
        )
        .await
    }

    async fn block(&self, uuid: &str) -> Result<Option<Block>> {
        self.call_as("logseq.Editor.getBlock", vec![json!(uuid)])
            .await
    }

    async fn insert_block(
        &self,
        parent: &str,
        content: &str,
        properties: Option<Map<String, Value>>,
        before: bool,
    ) -> Result<Value> {
        self.call(
            "logseq.Editor.insertBlock",
            vec![
                json!(parent),
                json!(content),
                json!({
                    "before": before,
                    "sibling": false,
                    "properties": properties_arg(properties),
                }),
            ],
        )
        .await
    }

    async fn move_block(&self, uuid: &str, target: &str, as_child: bool) -> Result<Value> {
        self.call(
            "logseq.Editor.moveBlock",
            vec![
                json!(uuid),
                json!(target),
                json!({ "before": false, "children": as_child }),
            ],
        )
        .await
    }

    async fn remove_block(&self, uuid: &str) -> Result<Value> {
        self.call("logseq.Editor.removeBlock", vec![json!(uuid)])
            .await
    }

    async fn delete_page(&self, name: &str) -> Result<Value> {
        self.call("logseq.Editor.deletePage", vec![json!(name)])
            .await
    }
}
