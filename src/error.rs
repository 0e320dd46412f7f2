//! Error types for the `chainboard` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, ChainError>`.
//!
//! [`ChainError`] covers:
//! - **API errors**: Structured `{"detail": ...}` error responses from the backend
//! - **HTTP status errors**: Unexpected status codes with response body
//! - **HTTP transport errors**: Network, TLS, timeout failures
//! - **JSON errors**: Deserialization failures
//! - **URL errors**: Malformed URL construction
//! - **Dashboard errors**: Empty selection, rejected watch-list edits, bad configuration
//!
//! Per-symbol failures inside a batch are *not* errors: they travel as
//! [`SymbolResult::Failure`](crate::types::option_chain::SymbolResult::Failure)
//! data so the downstream stages stay total.

use std::fmt;

/// Error response returned by the backend (FastAPI style).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorBody {
    /// Either a plain message or a structured validation report.
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(serde_json::Value::String(s)) => f.write_str(s),
            Some(other) => write!(f, "{other}"),
            None => f.write_str("No message"),
        }
    }
}

/// All possible errors produced by the `chainboard` client and dashboard.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// An error response returned by the backend REST API.
    #[error("{0}")]
    Api(ApiErrorBody),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON response body.
    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A pipeline run was requested with nothing selected.
    #[error("Select at least one stock.")]
    EmptySelection,

    /// The backend refused to add a symbol to the watch-list.
    #[error("{0}")]
    AddStock(String),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ChainError>;
