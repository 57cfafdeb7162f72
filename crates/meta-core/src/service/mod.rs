//! Scoped persist services
//!
//! Each service owns one region of the node layout (see [`crate::node`]) and
//! writes through the [`VersionedUnitStore`](crate::version::VersionedUnitStore).

pub mod data_source;
pub mod database_rule;
pub mod global_rule;
pub mod metadata;
pub mod props;

pub use data_source::{
    DataSourceNodePersistService, DataSourcePersistService, DataSourceUnitPersistService,
};
pub use database_rule::DatabaseRulePersistService;
pub use global_rule::GlobalRulePersistService;
pub use metadata::DatabaseMetaDataPersistFacade;
pub use props::PropertiesPersistService;

use crate::version::{PersistOutcome, VersionedUnitStore};
use crate::{Error, Result};
use meta_model::{RuleConfiguration, RuleVariant, SwapperRegistry};
use meta_store::RepositoryTuple;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub(crate) fn to_yaml<T: Serialize>(path: &str, value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::malformed(path, e))
}

pub(crate) fn from_yaml<T: DeserializeOwned>(path: &str, content: &str) -> Result<T> {
    serde_yaml::from_str(content).map_err(|e| Error::malformed(path, e))
}

/// Write rule tuples below `root`, one versioned unit per tuple.
pub(crate) fn persist_rule_tuples(
    store: &VersionedUnitStore,
    root: &str,
    tuples: &[RepositoryTuple],
) -> Result<Vec<PersistOutcome>> {
    let mut outcomes = Vec::with_capacity(tuples.len());
    for tuple in tuples {
        let Some(content) = tuple.content() else {
            continue;
        };
        outcomes.push(store.persist(tuple.under(root).path(), content)?);
    }
    Ok(outcomes)
}

/// Rebuild the configuration stored under `root` for one rule tag.
pub(crate) fn load_rule_by_tag(
    store: &VersionedUnitStore,
    swappers: &SwapperRegistry,
    root: &str,
    tag: &str,
) -> Result<Option<RuleConfiguration>> {
    let Some(swapper) = swappers.find(&RuleVariant::new(tag)) else {
        return Err(meta_model::Error::UnsupportedConfigurationVariant {
            variant: tag.to_string(),
        }
        .into());
    };
    let tag = swapper.rule_tag();
    let tag_root = format!("{}/{}", root, tag);
    let mut tuples = Vec::new();
    if let Some(content) = store.load(&tag_root)? {
        tuples.push(RepositoryTuple::new(tag.clone(), content));
    }
    tuples.extend(store.units_under(&tag_root)?.iter().map(|t| t.under(&tag)));
    Ok(swapper.swap_to_config(&tuples)?)
}
