//! Error types for container access.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for package operations.
pub type PackageResult<T> = Result<T, PackageError>;

/// Errors that can occur while reading or extracting a container.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("Package {path} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Path error at {path}: {source}")]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Entry {entry} not found in package {path}")]
    EntryNotFound { path: PathBuf, entry: String },

    #[error("No .vsdx package found in {0}")]
    NoPackage(PathBuf),
}

impl PackageError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Unreadable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }
}
