//! Error types for the bqdoc library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bqdoc operations.
#[derive(Debug, Error)]
pub enum BqdocError {
    /// Missing or unusable Google Cloud credentials.
    #[error("Credential error: {0}")]
    Credentials(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error talking to the BigQuery API.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Error response returned by the BigQuery API.
    #[error("BigQuery API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response that decoded but did not match what was asked for.
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error writing an output file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for bqdoc operations.
pub type Result<T> = std::result::Result<T, BqdocError>;
