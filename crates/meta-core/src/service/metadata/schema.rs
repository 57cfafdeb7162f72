//! Schema containers under `/metadata/<db>/schemas`

use super::{TableMetaDataPersistService, ViewMetaDataPersistService};
use crate::{Result, node};
use meta_model::Schema;
use meta_store::PersistRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct SchemaMetaDataPersistService {
    repository: Arc<dyn PersistRepository>,
    tables: TableMetaDataPersistService,
    views: ViewMetaDataPersistService,
}

impl SchemaMetaDataPersistService {
    pub fn new(
        repository: Arc<dyn PersistRepository>,
        tables: TableMetaDataPersistService,
        views: ViewMetaDataPersistService,
    ) -> Self {
        Self {
            repository,
            tables,
            views,
        }
    }

    /// Create an empty schema container.
    pub fn add(&self, database: &str, schema: &str) -> Result<()> {
        node::check_name(database)?;
        node::check_name(schema)?;
        self.repository
            .compare_and_swap(&node::schema(database, schema), None, "")?;
        Ok(())
    }

    pub fn drop(&self, database: &str, schema: &str) -> Result<()> {
        node::check_name(database)?;
        node::check_name(schema)?;
        self.repository.delete(&node::schema(database, schema))?;
        tracing::debug!(database, schema, "Dropped schema");
        Ok(())
    }

    /// Merge the tables and views of `schema` into the stored schema.
    ///
    /// A schema without tables and views only creates its container.
    pub fn alter_by_rule_altered(&self, database: &str, schema: &Schema) -> Result<()> {
        if schema.is_empty() {
            return self.add(database, schema.name());
        }
        let tables: Vec<_> = schema.tables().values().cloned().collect();
        let views: Vec<_> = schema.views().values().cloned().collect();
        self.tables.persist(database, schema.name(), &tables)?;
        self.views.persist(database, schema.name(), &views)
    }

    /// Persist the tables and views of `schema` without creating its container.
    ///
    /// Used on the drop path, where an added schema that carries nothing is
    /// not materialized.
    pub fn alter_by_rule_dropped(&self, database: &str, schema: &Schema) -> Result<()> {
        node::check_name(schema.name())?;
        let tables: Vec<_> = schema.tables().values().cloned().collect();
        let views: Vec<_> = schema.views().values().cloned().collect();
        self.tables.persist(database, schema.name(), &tables)?;
        self.views.persist(database, schema.name(), &views)
    }

    /// The stored schema, or `None` if it does not exist.
    pub fn load(&self, database: &str, schema: &str) -> Result<Option<Schema>> {
        if !self.repository.exists(&node::schema(database, schema))? {
            return Ok(None);
        }
        let mut result = Schema::new(schema.to_lowercase());
        for table in self.tables.load_all(database, schema)? {
            result.put_table(table);
        }
        for view in self.views.load_all(database, schema)? {
            result.put_view(view);
        }
        Ok(Some(result))
    }

    pub fn load_all_names(&self, database: &str) -> Result<Vec<String>> {
        Ok(self.repository.get_children_keys(&node::schemas(database))?)
    }
}
