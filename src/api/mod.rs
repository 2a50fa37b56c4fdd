//! API Module
//!
//! HTTP handlers and routing for the context server REST API.
//!
//! # Endpoints
//! - `GET /resources` and `GET /resources/...` - Cached context resources
//! - `GET|POST /tools/pages`, `GET /tools/pages/:name[/blocks|/references]`
//! - `GET /tools/search?query=` - Block search
//! - `POST /tools/blocks`, `PUT /tools/blocks/:uuid` - Block writes
//! - `GET /cache/stats`, `DELETE /cache`, `DELETE /cache/:key` - Cache control
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
