//! Database structure persistence: databases, schemas, tables and views

mod database;
mod schema;
mod table;
mod view;

pub use database::DatabaseMetaDataPersistService;
pub use schema::SchemaMetaDataPersistService;
pub use table::TableMetaDataPersistService;
pub use view::ViewMetaDataPersistService;

use crate::Result;
use crate::reconcile::{ReconciliationPlan, SchemaOperation};
use crate::version::VersionedUnitStore;
use meta_model::{Database, Schema};
use meta_store::PersistRepository;
use std::sync::Arc;

/// Entry point to the database structure services.
#[derive(Clone)]
pub struct DatabaseMetaDataPersistFacade {
    database: DatabaseMetaDataPersistService,
    schema: SchemaMetaDataPersistService,
    table: TableMetaDataPersistService,
    view: ViewMetaDataPersistService,
}

impl DatabaseMetaDataPersistFacade {
    pub fn new(repository: Arc<dyn PersistRepository>, store: VersionedUnitStore) -> Self {
        let table = TableMetaDataPersistService::new(store.clone());
        let view = ViewMetaDataPersistService::new(store);
        Self {
            database: DatabaseMetaDataPersistService::new(repository.clone()),
            schema: SchemaMetaDataPersistService::new(repository, table.clone(), view.clone()),
            table,
            view,
        }
    }

    pub fn database(&self) -> &DatabaseMetaDataPersistService {
        &self.database
    }

    pub fn schema(&self) -> &SchemaMetaDataPersistService {
        &self.schema
    }

    pub fn table(&self) -> &TableMetaDataPersistService {
        &self.table
    }

    pub fn view(&self) -> &ViewMetaDataPersistService {
        &self.view
    }

    /// Rebuild the stored structure of `database`.
    pub fn load_schemas(&self, database: &str) -> Result<Database> {
        let mut result = Database::new(database);
        for name in self.schema.load_all_names(database)? {
            if let Some(schema) = self.schema.load(database, &name)? {
                result.put_schema(schema);
            }
        }
        Ok(result)
    }

    /// Execute a reconciliation plan against `database`, in plan order.
    pub fn apply(&self, database: &str, plan: &ReconciliationPlan) -> Result<()> {
        for operation in plan.operations() {
            tracing::debug!(database, ?operation, "Applying schema operation");
            match operation {
                SchemaOperation::AlterSchema {
                    schema,
                    tables,
                    views,
                } => {
                    if tables.is_empty() && views.is_empty() {
                        self.schema.add(database, schema)?;
                    } else {
                        self.table.persist(database, schema, tables)?;
                        self.view.persist(database, schema, views)?;
                    }
                }
                SchemaOperation::ReplaceTables {
                    schema,
                    tables,
                    views,
                } => {
                    for table in tables {
                        self.table.drop(database, schema, &table.name)?;
                    }
                    for view in views {
                        self.view.drop(database, schema, &view.name)?;
                    }
                    let replacement = tables
                        .iter()
                        .cloned()
                        .fold(Schema::new(schema.as_str()), Schema::with_table);
                    let replacement = views.iter().cloned().fold(replacement, Schema::with_view);
                    self.schema.alter_by_rule_dropped(database, &replacement)?;
                }
                SchemaOperation::DropSchema { schema } => self.schema.drop(database, schema)?,
                SchemaOperation::DropTables {
                    schema,
                    tables,
                    views,
                } => {
                    for table in tables {
                        self.table.drop(database, schema, table)?;
                    }
                    for view in views {
                        self.view.drop(database, schema, view)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VersionSection;
    use crate::reconcile::SchemaDiff;
    use meta_model::{Column, Table, View};
    use meta_store::MemoryRepository;
    use pretty_assertions::assert_eq;

    fn facade() -> (Arc<MemoryRepository>, DatabaseMetaDataPersistFacade) {
        let repository = Arc::new(MemoryRepository::new());
        let store = VersionedUnitStore::new(repository.clone(), VersionSection::default());
        (repository.clone(), DatabaseMetaDataPersistFacade::new(repository, store))
    }

    fn order_table() -> Table {
        Table::new("T_Order")
            .with_column(Column::new("order_id", "BIGINT").primary_key().generated())
            .with_column(Column::new("user_id", "INT"))
    }

    #[test]
    fn test_database_lifecycle() {
        let (_, facade) = facade();

        facade.database().add("foo_db").unwrap();
        facade.database().add("bar_db").unwrap();
        assert!(facade.database().exists("foo_db").unwrap());
        assert_eq!(facade.database().load_all_names().unwrap(), vec!["bar_db", "foo_db"]);

        facade.database().drop("foo_db").unwrap();
        assert!(!facade.database().exists("foo_db").unwrap());
    }

    #[test]
    fn test_table_round_trip_lower_cases_node() {
        let (repository, facade) = facade();

        facade.table().persist("db", "Public", &[order_table()]).unwrap();

        assert!(repository
            .get("/metadata/db/schemas/public/tables/t_order/active_version")
            .unwrap()
            .is_some());
        assert_eq!(facade.table().load("db", "public", "T_ORDER").unwrap(), Some(order_table()));
    }

    #[test]
    fn test_empty_schema_creates_container() {
        let (_, facade) = facade();

        facade.schema().alter_by_rule_altered("db", &Schema::new("empty")).unwrap();

        let loaded = facade.load_schemas("db").unwrap();
        assert!(loaded.schema("empty").is_some_and(Schema::is_empty));
    }

    #[test]
    fn test_alter_by_rule_dropped_persists_without_container() {
        let (repository, facade) = facade();
        facade.table().persist("db", "s", &[Table::new("t_user")]).unwrap();
        let schema = Schema::new("s")
            .with_table(order_table())
            .with_view(View::new("v_order", "SELECT * FROM t_order"));

        facade.schema().alter_by_rule_dropped("db", &schema).unwrap();
        facade.schema().alter_by_rule_dropped("db", &Schema::new("empty")).unwrap();

        let loaded = facade.schema().load("db", "s").unwrap().unwrap();
        assert!(loaded.contains_table("t_order"));
        assert!(loaded.contains_table("t_user"));
        assert!(loaded.view("v_order").is_some());
        assert_eq!(repository.get("/metadata/db/schemas/s").unwrap(), None);
        assert!(facade.schema().load("db", "empty").unwrap().is_none());
    }

    #[test]
    fn test_drops_reject_invalid_names() {
        let (repository, facade) = facade();
        facade.table().persist("db", "s", &[Table::new("t_user")]).unwrap();

        assert!(facade.schema().drop("db", "..").is_err());
        assert!(facade.table().drop("db", "..", "t_user").is_err());
        assert!(facade.table().drop("db", "s", "..").is_err());
        assert!(facade.view().drop("db", "s", "..").is_err());
        assert!(repository
            .get("/metadata/db/schemas/s/tables/t_user/active_version")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_replace_tables_restarts_version_history() {
        let repository = Arc::new(MemoryRepository::new());
        let store = VersionedUnitStore::new(repository.clone(), VersionSection::default());
        let facade = DatabaseMetaDataPersistFacade::new(repository, store.clone());
        facade.table().persist("db", "s", &[Table::new("t_order")]).unwrap();
        facade.table().persist("db", "s", &[order_table()]).unwrap();
        let current = facade.load_schemas("db").unwrap();
        let reload = Database::new("db").with_schema(Schema::new("s").with_table(Table::new("t_order")));

        facade
            .apply("db", &ReconciliationPlan::by_drop(&SchemaDiff::compute(&reload, &current)))
            .unwrap();

        let unit = crate::node::table("db", "s", "t_order");
        assert_eq!(store.versions(&unit).unwrap(), vec![0]);
        assert_eq!(facade.table().load("db", "s", "t_order").unwrap(), Some(Table::new("t_order")));
    }
}
