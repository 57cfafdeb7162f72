//! Engine configuration loaded from TOML
//!
//! # Example TOML
//!
//! ```toml
//! [version]
//! max_attempts = 8
//! initial_backoff_ms = 1
//! max_backoff_ms = 50
//! skip_unchanged = true
//!
//! [logging]
//! filter = "meta_core=debug,info"
//! thread_ids = false
//! ```

use crate::{Error, Result};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Versioned write settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionSection {
    /// Bound of the active-pointer compare-and-swap loop
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Do not append a version when the active content is identical
    pub skip_unchanged: bool,
}

impl Default for VersionSection {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            initial_backoff_ms: 1,
            max_backoff_ms: 50,
            skip_unchanged: true,
        }
    }
}

impl VersionSection {
    /// Delay schedule between CAS attempts. The attempt count is the only bound.
    pub fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(self.initial_backoff_ms))
            .with_max_interval(Duration::from_millis(self.max_backoff_ms))
            .with_max_elapsed_time(None)
            .build()
    }
}

/// Log output settings, used when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directives
    pub filter: String,
    pub thread_ids: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            thread_ids: true,
        }
    }
}

/// Configuration of the persistence engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistConfig {
    #[serde(default)]
    pub version: VersionSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl PersistConfig {
    /// Parse and validate a configuration from TOML content.
    ///
    /// Missing sections and keys fall back to defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use meta_core::config::PersistConfig;
    ///
    /// let config = PersistConfig::parse("[version]\nmax_attempts = 3\n").unwrap();
    /// assert_eq!(config.version.max_attempts, 3);
    /// assert!(config.version.skip_unchanged);
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let config: PersistConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version.max_attempts == 0 {
            return Err(Error::invalid_config("version.max_attempts must be at least 1"));
        }
        if self.version.initial_backoff_ms > self.version.max_backoff_ms {
            return Err(Error::invalid_config(
                "version.initial_backoff_ms must not exceed version.max_backoff_ms",
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err(Error::invalid_config("logging.filter must not be empty"));
        }
        Ok(())
    }
}
