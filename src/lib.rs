//! Logseq Context - contextual information about a Logseq graph
//!
//! Serves cached graph resources (overview, recent pages and journals,
//! templates, namespace structure) and pass-through page and block tools
//! over HTTP.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod models;
pub mod resources;

pub use api::{create_router, AppState};
pub use client::{GraphApi, LogseqClient};
pub use config::Config;
pub use error::{Error, Result};
pub use resources::Resources;
