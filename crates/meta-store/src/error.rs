//! Error types for meta-store

use std::path::PathBuf;

/// Result type for meta-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a coordination store
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure reported by the store client
    #[error("Repository unavailable: {message}")]
    Unavailable { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid node path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
