//! View metadata under `/metadata/<db>/schemas/<schema>/views`

use crate::service::{from_yaml, to_yaml};
use crate::version::VersionedUnitStore;
use crate::{Result, node};
use meta_model::View;

#[derive(Debug, Clone)]
pub struct ViewMetaDataPersistService {
    store: VersionedUnitStore,
}

impl ViewMetaDataPersistService {
    pub fn new(store: VersionedUnitStore) -> Self {
        Self { store }
    }

    pub fn persist(&self, database: &str, schema: &str, views: &[View]) -> Result<()> {
        for view in views {
            node::check_name(&view.name)?;
            let unit = node::view(database, schema, &view.name);
            self.store.persist(&unit, &to_yaml(&unit, view)?)?;
        }
        Ok(())
    }

    pub fn drop(&self, database: &str, schema: &str, view: &str) -> Result<()> {
        node::check_name(schema)?;
        node::check_name(view)?;
        self.store.delete(&node::view(database, schema, view))
    }

    pub fn load(&self, database: &str, schema: &str, view: &str) -> Result<Option<View>> {
        let unit = node::view(database, schema, view);
        self.store
            .load(&unit)?
            .map(|content| from_yaml(&unit, &content))
            .transpose()
    }

    pub fn load_all(&self, database: &str, schema: &str) -> Result<Vec<View>> {
        let names = self
            .store
            .repository()
            .get_children_keys(&node::views(database, schema))?;
        let mut result = Vec::with_capacity(names.len());
        for name in names {
            if let Some(view) = self.load(database, schema, &name)? {
                result.push(view);
            }
        }
        Ok(result)
    }
}
