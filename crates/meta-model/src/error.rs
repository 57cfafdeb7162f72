//! Error types for meta-model

/// Result type for meta-model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while converting, decorating or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registered swapper claims the configuration variant
    #[error("Unsupported configuration variant: {variant}")]
    UnsupportedConfigurationVariant { variant: String },

    /// Persisted tuple content could not be parsed for its variant
    #[error("Malformed persisted {variant} configuration at {path}: {message}")]
    MalformedPersistedConfiguration {
        variant: String,
        path: String,
        message: String,
    },

    /// A decorator rejected the configuration
    #[error("Decoration failed for {variant}: {message}")]
    DecorationFailed { variant: String, message: String },

    /// A typed configuration could not be encoded
    #[error("Failed to serialize {variant} configuration: {message}")]
    Serialize { variant: String, message: String },

    /// The same tuple path appeared twice in one write batch
    #[error("Duplicate tuple path in write batch: {path}")]
    DuplicateTuplePath { path: String },
}

impl Error {
    pub fn malformed(
        variant: impl Into<String>,
        path: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::MalformedPersistedConfiguration {
            variant: variant.into(),
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn decoration_failed(variant: impl Into<String>, message: impl ToString) -> Self {
        Self::DecorationFailed {
            variant: variant.into(),
            message: message.to_string(),
        }
    }
}
