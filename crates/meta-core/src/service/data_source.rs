//! Data source pool properties under `/metadata/<db>/data_sources`
//!
//! Storage units and storage nodes share the same persisted shape and only
//! differ in their parent node.

use super::{from_yaml, to_yaml};
use crate::version::VersionedUnitStore;
use crate::{Result, node};
use meta_model::{DataSourceMap, DataSourcePoolProperties};
use std::marker::PhantomData;

/// Parent node of one kind of data source.
pub trait DataSourceSection: Send + Sync {
    fn root(database: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Units;

impl DataSourceSection for Units {
    fn root(database: &str) -> String {
        node::data_source_units(database)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Nodes;

impl DataSourceSection for Nodes {
    fn root(database: &str) -> String {
        node::data_source_nodes(database)
    }
}

/// Persists one versioned unit of pool properties per data source.
///
/// Names are case-sensitive: `ds_0` and `DS_0` are different data sources.
#[derive(Debug, Clone)]
pub struct DataSourcePersistService<S> {
    store: VersionedUnitStore,
    _section: PhantomData<fn() -> S>,
}

pub type DataSourceUnitPersistService = DataSourcePersistService<Units>;
pub type DataSourceNodePersistService = DataSourcePersistService<Nodes>;

impl<S: DataSourceSection> DataSourcePersistService<S> {
    pub fn new(store: VersionedUnitStore) -> Self {
        Self {
            store,
            _section: PhantomData,
        }
    }

    fn unit(database: &str, name: &str) -> String {
        format!("{}/{}", S::root(database), name)
    }

    pub fn persist(&self, database: &str, data_sources: &DataSourceMap) -> Result<()> {
        node::check_name(database)?;
        for (name, props) in data_sources {
            node::check_name(name)?;
            let unit = Self::unit(database, name);
            let outcome = self.store.persist(&unit, &to_yaml(&unit, props)?)?;
            tracing::debug!(database, data_source = name.as_str(), version = outcome.version, "Persisted data source");
        }
        Ok(())
    }

    /// Active pool properties of every data source of `database`.
    pub fn load(&self, database: &str) -> Result<DataSourceMap> {
        let mut result = DataSourceMap::new();
        for name in self.store.repository().get_children_keys(&S::root(database))? {
            let unit = Self::unit(database, &name);
            if let Some(content) = self.store.load(&unit)? {
                let props: DataSourcePoolProperties = from_yaml(&unit, &content)?;
                result.insert(name, props);
            }
        }
        Ok(result)
    }

    pub fn load_one(&self, database: &str, name: &str) -> Result<Option<DataSourcePoolProperties>> {
        let unit = Self::unit(database, name);
        self.store
            .load(&unit)?
            .map(|content| from_yaml(&unit, &content))
            .transpose()
    }

    pub fn delete(&self, database: &str, name: &str) -> Result<()> {
        node::check_name(name)?;
        self.store.delete(&Self::unit(database, name))
    }
}
