//! Error types for diagram resolution.

use std::path::PathBuf;
use thiserror::Error;

use topo_package::PackageError;

/// Result type alias for diagram operations.
pub type DiagramResult<T> = Result<T, DiagramError>;

/// Errors that can occur while resolving or exporting device names.
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Malformed descriptor {path}: {message}")]
    MalformedDescriptor { path: PathBuf, message: String },

    #[error("Cannot read descriptor {path}: {source}")]
    MissingDescriptor {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write device names to {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown namespace prefix in qualified name: {0}")]
    UnknownPrefix(String),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),
}

impl DiagramError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedDescriptor {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
