//! Tracing subscriber setup

use crate::config::LoggingSection;
use crate::{Error, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber with default settings.
pub fn init() -> Result<()> {
    init_with(&LoggingSection::default())
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `section.filter`. Installing a second
/// subscriber is reported as [`Error::InvalidConfig`] rather than a panic.
pub fn init_with(section: &LoggingSection) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&section.filter).map_err(|e| {
            Error::invalid_config(format!("logging.filter '{}': {}", section.filter, e))
        })?,
    };
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(section.thread_ids)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::invalid_config(format!("tracing subscriber: {}", e)))
}
