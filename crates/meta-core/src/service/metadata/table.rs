//! Table metadata under `/metadata/<db>/schemas/<schema>/tables`

use crate::service::{from_yaml, to_yaml};
use crate::version::VersionedUnitStore;
use crate::{Result, node};
use meta_model::Table;

#[derive(Debug, Clone)]
pub struct TableMetaDataPersistService {
    store: VersionedUnitStore,
}

impl TableMetaDataPersistService {
    pub fn new(store: VersionedUnitStore) -> Self {
        Self { store }
    }

    pub fn persist(&self, database: &str, schema: &str, tables: &[Table]) -> Result<()> {
        for table in tables {
            node::check_name(&table.name)?;
            let unit = node::table(database, schema, &table.name);
            self.store.persist(&unit, &to_yaml(&unit, table)?)?;
        }
        Ok(())
    }

    pub fn drop(&self, database: &str, schema: &str, table: &str) -> Result<()> {
        node::check_name(schema)?;
        node::check_name(table)?;
        self.store.delete(&node::table(database, schema, table))
    }

    pub fn load(&self, database: &str, schema: &str, table: &str) -> Result<Option<Table>> {
        let unit = node::table(database, schema, table);
        self.store
            .load(&unit)?
            .map(|content| from_yaml(&unit, &content))
            .transpose()
    }

    /// All tables of a schema in name order.
    pub fn load_all(&self, database: &str, schema: &str) -> Result<Vec<Table>> {
        let names = self
            .store
            .repository()
            .get_children_keys(&node::tables(database, schema))?;
        let mut result = Vec::with_capacity(names.len());
        for name in names {
            if let Some(table) = self.load(database, schema, &name)? {
                result.push(table);
            }
        }
        Ok(result)
    }
}
