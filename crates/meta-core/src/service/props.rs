//! Global properties under `/props`

use super::{from_yaml, to_yaml};
use crate::version::{PersistOutcome, VersionedUnitStore};
use crate::{Result, node};
use meta_model::ConfigurationProperties;

#[derive(Debug, Clone)]
pub struct PropertiesPersistService {
    store: VersionedUnitStore,
}

impl PropertiesPersistService {
    pub fn new(store: VersionedUnitStore) -> Self {
        Self { store }
    }

    pub fn persist(&self, props: &ConfigurationProperties) -> Result<PersistOutcome> {
        let content = to_yaml(node::PROPS_NODE, props)?;
        self.store.persist(node::PROPS_NODE, &content)
    }

    /// Active properties; an absent unit yields empty properties.
    pub fn load(&self) -> Result<ConfigurationProperties> {
        match self.store.load(node::PROPS_NODE)? {
            Some(content) => from_yaml(node::PROPS_NODE, &content),
            None => Ok(ConfigurationProperties::default()),
        }
    }
}
