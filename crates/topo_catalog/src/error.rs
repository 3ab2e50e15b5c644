//! Error types for the template catalog.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while fetching or exporting templates.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Template endpoint unreachable at {url}: {source}")]
    EndpointUnreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },

    #[error("Failed to write templates to {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid server endpoint '{0}': expected <host>,<port>")]
    InvalidEndpoint(String),

    #[error("Invalid server config {path}: {reason}")]
    ServerConfig { path: PathBuf, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
