//! Data models for the context server
//!
//! Typed Logseq records plus the DTOs used for HTTP request and response
//! bodies.

pub mod graph;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use graph::{Block, JournalDay, Page, PageRef};
pub use requests::{
    CreateBlockRequest, CreatePageRequest, InsertBlockRequest, MoveBlockRequest, SearchQuery,
    UpdateBlockRequest,
};
pub use responses::{HealthResponse, InvalidateResponse, ResourceDescriptor, StatsResponse};
