//! Error types for icon_sync

use std::io;
use thiserror::Error;

/// Errors that end an export run
///
/// Bucket-level resolver anomalies and missing rendering URLs are not
/// errors; they are logged and the run continues.
#[derive(Error, Debug)]
pub enum IconSyncError {
    /// Invalid or incomplete configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport failure talking to the remote API or an asset URL
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The requested node has no document in the nodes response
    #[error("No document for node '{node_id}' in response{}", .detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default())]
    MissingDocument {
        node_id: String,
        detail: Option<String>,
    },

    /// Failed to write the output file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for icon_sync operations
pub type Result<T> = std::result::Result<T, IconSyncError>;
