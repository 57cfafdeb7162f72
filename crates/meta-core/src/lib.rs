//! Metadata persistence engine for shard-meta
//!
//! Persists cluster-wide and per-database configuration into a versioned,
//! path-keyed coordination store and reconciles schema snapshots against
//! what is stored.
//!
//! - [`version`]: write-once versions with an atomically switched active pointer
//! - [`service`]: scoped persist services for rules, properties, data sources
//!   and schema structure
//! - [`reconcile`]: schema diffing and reconciliation plans
//! - [`MetaDataPersistService`]: the façade composing all of the above

pub mod config;
pub mod error;
pub mod logging;
pub mod node;
pub mod persist;
pub mod reconcile;
pub mod service;
pub mod version;

pub use config::PersistConfig;
pub use error::{Error, Result};
pub use persist::MetaDataPersistService;
pub use reconcile::{ReconciliationPlan, SchemaDiff, SchemaOperation};
pub use version::{PersistOutcome, VersionedUnitStore};
