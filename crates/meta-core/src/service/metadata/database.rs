//! Database markers under `/metadata`

use crate::{Result, node};
use meta_store::PersistRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct DatabaseMetaDataPersistService {
    repository: Arc<dyn PersistRepository>,
}

impl DatabaseMetaDataPersistService {
    pub fn new(repository: Arc<dyn PersistRepository>) -> Self {
        Self { repository }
    }

    /// Register `database` with an empty marker node. Existing content is kept.
    pub fn add(&self, database: &str) -> Result<()> {
        node::check_name(database)?;
        if self
            .repository
            .compare_and_swap(&node::database(database), None, "")?
        {
            tracing::debug!(database, "Added database marker");
        }
        Ok(())
    }

    pub fn exists(&self, database: &str) -> Result<bool> {
        Ok(self.repository.exists(&node::database(database))?)
    }

    /// Remove the database with all of its data sources, rules and schemas.
    pub fn drop(&self, database: &str) -> Result<()> {
        node::check_name(database)?;
        self.repository.delete(&node::database(database))?;
        tracing::debug!(database, "Dropped database");
        Ok(())
    }

    pub fn load_all_names(&self) -> Result<Vec<String>> {
        Ok(self.repository.get_children_keys(node::METADATA_ROOT)?)
    }
}
