use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AtlasError>;

/// Errors surfaced by registry lookups and path resolution.
///
/// All variants are recoverable; callers turn them into user-facing messages.
/// Malformed registry or metadata text never produces an error.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Project '{0}' not found in registry")]
    ProjectNotFound(String),

    #[error("Project '{0}' has no path configured")]
    MissingPath(String),

    #[error("Invalid path {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("Path '{relative}' escapes project boundary for '{slug}'")]
    PathBoundaryViolation { slug: String, relative: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AtlasError {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
