//! Error types for meta-core

use std::path::PathBuf;

/// Result type for meta-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the persistence engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An optimistic write kept losing the active-pointer race
    #[error("Version conflict on {unit} after {attempts} attempts")]
    VersionConflict { unit: String, attempts: u32 },

    /// The active pointer references a version that does not exist
    #[error("Active version {version} of {unit} does not exist")]
    DanglingActiveVersion { unit: String, version: u64 },

    /// Engine configuration rejected during validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Stored content could not be decoded
    #[error("Malformed content at {path}: {message}")]
    MalformedStoredContent { path: String, message: String },

    /// Configuration file could not be read
    #[error("Failed to read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Transparent wrappers for underlying crate errors
    /// Coordination store error, including `Unavailable`
    #[error(transparent)]
    Store(#[from] meta_store::Error),

    /// Configuration model error
    #[error(transparent)]
    Model(#[from] meta_model::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn malformed(path: impl Into<String>, message: impl ToString) -> Self {
        Self::MalformedStoredContent {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// True for failures a caller may retry with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::VersionConflict { .. } | Self::Store(meta_store::Error::Unavailable { .. })
        )
    }
}
