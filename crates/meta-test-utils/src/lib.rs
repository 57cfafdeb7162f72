//! Shared test utilities for the shard-meta workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: sample data sources, rule sets and schemas
//! - [`repository`]: fault-injecting repositories and a temporary file store

pub mod fixtures;
pub mod repository;
