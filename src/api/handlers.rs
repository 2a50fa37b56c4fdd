//! API Handlers
//!
//! HTTP request handlers for resources, graph tools and cache control.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::client::GraphApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{
    Block, CreateBlockRequest, CreatePageRequest, HealthResponse, InsertBlockRequest,
    InvalidateResponse, MoveBlockRequest, Page, ResourceDescriptor, SearchQuery, StatsResponse,
    UpdateBlockRequest,
};
use crate::resources::{Resources, RESOURCE_DESCRIPTORS};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub resources: Resources,
}

impl AppState {
    pub fn new(resources: Resources) -> Self {
        Self { resources }
    }

    /// Creates a new AppState from configuration and a graph client.
    pub fn from_config(client: Arc<dyn GraphApi>, config: Config) -> Self {
        Self::new(Resources::from_config(client, config))
    }

    fn client(&self) -> &dyn GraphApi {
        self.resources.client()
    }

    /// Drops every cached resource after a write to the graph.
    async fn invalidate_after_write(&self, operation: &str) {
        let removed = self.resources.invalidate(None).await;
        info!(operation, removed, "graph modified, resource cache cleared");
    }
}

// == Resources ==
/// Handler for GET /resources
pub async fn list_resources_handler() -> Json<Vec<ResourceDescriptor>> {
    Json(RESOURCE_DESCRIPTORS.to_vec())
}

/// Handler for GET /resources/graph/info
pub async fn graph_info_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.resources.graph_info().await?))
}

/// Handler for GET /resources/pages/recent
pub async fn recent_pages_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.resources.recent_pages().await?))
}

/// Handler for GET /resources/journal/recent
pub async fn recent_journals_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.resources.recent_journals().await?))
}

/// Handler for GET /resources/templates/list
pub async fn templates_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.resources.templates().await?))
}

/// Handler for GET /resources/graph/structure
pub async fn graph_structure_handler(State(state): State<AppState>) -> Result<Json<Value>> {
    Ok(Json(state.resources.graph_structure().await?))
}

// == Tools ==
/// Handler for GET /tools/pages
pub async fn all_pages_handler(State(state): State<AppState>) -> Result<Json<Vec<Page>>> {
    Ok(Json(state.client().all_pages().await?))
}

/// Handler for GET /tools/pages/:name
pub async fn page_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Page>> {
    state
        .client()
        .page(&name)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Page '{}'", name)))
}

/// Handler for GET /tools/pages/:name/blocks
pub async fn page_blocks_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Block>>> {
    Ok(Json(state.client().page_blocks(&name).await?))
}

/// Handler for GET /tools/pages/:name/references
pub async fn page_references_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Value>>> {
    Ok(Json(state.client().page_linked_references(&name).await?))
}

/// Handler for GET /tools/search?query=
pub async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Block>>> {
    if let Some(error_msg) = query.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }
    Ok(Json(state.client().search_blocks(&query.query).await?))
}

/// Handler for POST /tools/pages
pub async fn create_page_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePageRequest>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let created = state.client().create_page(&req.name, req.properties).await?;
    state.invalidate_after_write("create_page").await;
    Ok(Json(created))
}

/// Handler for POST /tools/blocks
pub async fn create_block_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateBlockRequest>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let created = state
        .client()
        .create_block(&req.page, &req.content, req.properties)
        .await?;
    state.invalidate_after_write("create_block").await;
    Ok(Json(created))
}

/// Handler for PUT /tools/blocks/:uuid
pub async fn update_block_handler(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Json(req): Json<UpdateBlockRequest>,
) -> Result<Json<Value>> {
    let updated = state
        .client()
        .update_block(&uuid, &req.content, req.properties)
        .await?;
    state.invalidate_after_write("update_block").await;
    Ok(Json(updated))
}

/// Handler for GET /tools/blocks/:uuid
pub async fn block_handler(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Block>> {
    state
        .client()
        .block(&uuid)
        .await?
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("Block '{}'", uuid)))
}

/// Handler for POST /tools/blocks/:uuid/children
pub async fn insert_block_handler(
    State(state): State<AppState>,
    Path(parent): Path<String>,
    Json(req): Json<InsertBlockRequest>,
) -> Result<Json<Value>> {
    let inserted = state
        .client()
        .insert_block(&parent, &req.content, req.properties, req.before)
        .await?;
    state.invalidate_after_write("insert_block").await;
    Ok(Json(inserted))
}

/// Handler for POST /tools/blocks/:uuid/move
pub async fn move_block_handler(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
    Json(req): Json<MoveBlockRequest>,
) -> Result<Json<Value>> {
    if let Some(error_msg) = req.validate() {
        return Err(Error::InvalidRequest(error_msg));
    }

    let moved = state
        .client()
        .move_block(&uuid, &req.target, req.as_child)
        .await?;
    state.invalidate_after_write("move_block").await;
    Ok(Json(moved))
}

/// Handler for DELETE /tools/blocks/:uuid
pub async fn remove_block_handler(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<Value>> {
    let removed = state.client().remove_block(&uuid).await?;
    state.invalidate_after_write("remove_block").await;
    Ok(Json(removed))
}

/// Handler for DELETE /tools/pages/:name
pub async fn delete_page_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>> {
    let deleted = state.client().delete_page(&name).await?;
    state.invalidate_after_write("delete_page").await;
    Ok(Json(deleted))
}

// == Cache ==
/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (stats, ttl_secs) = state.resources.cache_stats().await;
    Json(StatsResponse::new(&stats, ttl_secs))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<InvalidateResponse> {
    let removed = state.resources.invalidate(None).await;
    Json(InvalidateResponse::new(None, removed))
}

/// Handler for DELETE /cache/:key
pub async fn invalidate_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.resources.invalidate(Some(&key)).await;
    Json(InvalidateResponse::new(Some(&key), removed))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
