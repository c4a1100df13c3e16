//! Error types for the preview server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading data or serving a page.
#[derive(Error, Debug)]
pub enum PreviewError {
    /// Requested page is absent, has the wrong extension, or escapes the asset root
    #[error("Page not found")]
    NotFound,

    /// A data file exists but could not be read
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        /// The file that failed to read
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A data file exists but is not a JSON object
    #[error("Invalid JSON in '{}': {source}", .path.display())]
    Parse {
        /// The file that failed to parse
        path: PathBuf,
        /// The underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Bridge data could not be serialized
    #[error("Failed to serialize bridge data: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The embedded metadata catalog is missing or malformed
    #[error("Metadata catalog error: {0}")]
    Catalog(String),
}

/// Result type for preview operations.
pub type Result<T> = std::result::Result<T, PreviewError>;

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        match self {
            // Path escapes land here too; nothing about the filesystem is disclosed.
            Self::NotFound => StatusCode::NOT_FOUND.into_response(),
            other => {
                tracing::error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            },
        }
    }
}
