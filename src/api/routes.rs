//! API Routes
//!
//! Configures the Axum router with all context server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    all_pages_handler, block_handler, clear_cache_handler, create_block_handler,
    create_page_handler, delete_page_handler, graph_info_handler, graph_structure_handler,
    health_handler, insert_block_handler, invalidate_key_handler, list_resources_handler,
    move_block_handler, page_blocks_handler, page_handler, page_references_handler,
    recent_journals_handler, recent_pages_handler, remove_block_handler, search_handler,
    stats_handler, templates_handler, update_block_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /resources` - List published resources
/// - `GET /resources/...` - Cached graph context documents
/// - `/tools/...` - Direct page, block and search calls against Logseq
/// - `GET /cache/stats`, `DELETE /cache`, `DELETE /cache/:key` - Cache control
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Resources
        .route("/resources", get(list_resources_handler))
        .route("/resources/graph/info", get(graph_info_handler))
        .route("/resources/pages/recent", get(recent_pages_handler))
        .route("/resources/journal/recent", get(recent_journals_handler))
        .route("/resources/templates/list", get(templates_handler))
        .route("/resources/graph/structure", get(graph_structure_handler))
        // Tools
        .route(
            "/tools/pages",
            get(all_pages_handler).post(create_page_handler),
        )
        .route(
            "/tools/pages/:name",
            get(page_handler).delete(delete_page_handler),
        )
        .route("/tools/pages/:name/blocks", get(page_blocks_handler))
        .route("/tools/pages/:name/references", get(page_references_handler))
        .route("/tools/search", get(search_handler))
        .route("/tools/blocks", post(create_block_handler))
        .route(
            "/tools/blocks/:uuid",
            get(block_handler)
                .put(update_block_handler)
                .delete(remove_block_handler),
        )
        .route("/tools/blocks/:uuid/children", post(insert_block_handler))
        .route("/tools/blocks/:uuid/move", post(move_block_handler))
        // Cache
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/:key", delete(invalidate_key_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
