//! Content store errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned when loading a single post
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no post with slug `{0}`")]
    NotFound(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ContentError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the not-found case rather than a fault
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}
