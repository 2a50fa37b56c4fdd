//! Error types for the context server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Error Enum ==
/// Unified error type for the context server.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unusable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logseq API answered with a non-success status
    #[error("Logseq API call {method} failed with status {status}: {body}")]
    Api {
        /// API method that was invoked
        method: String,
        /// HTTP status code returned
        status: u16,
        /// Response body, as text
        body: String,
    },

    /// Transport-level failure talking to the Logseq API
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Payload could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Requested page or entry does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A blocking filesystem task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

// == IntoResponse Implementation ==
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Config(_) | Error::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Api { .. } | Error::Http(_) | Error::Json(_) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the context server.
pub type Result<T> = std::result::Result<T, Error>;
