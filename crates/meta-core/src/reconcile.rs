//! Schema reconciliation
//!
//! [`SchemaDiff::compute`] compares a freshly introspected snapshot of a
//! database with the previously persisted one. A [`ReconciliationPlan`] turns
//! the diff into the persist operations for one of two triggers:
//!
//! - **alter**: merge added tables into their schema and drop removed tables
//!   one by one. Whole schemas are never dropped.
//! - **drop**: replace added tables at a fresh version history, drop schemas
//!   missing from the reload and drop removed tables of the rest.
//!
//! Everything here is pure; the plan is executed by
//! [`DatabaseMetaDataPersistFacade::apply`](crate::service::DatabaseMetaDataPersistFacade::apply).

use meta_model::{Database, Schema, Table, View};
use std::collections::{BTreeMap, BTreeSet};

/// Difference between a reloaded and a current database snapshot.
///
/// All maps are keyed by lower-cased schema name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDiff {
    /// New schemas in full, and for shared schemas the new or changed tables and views
    pub to_be_added: BTreeMap<String, Schema>,
    /// Tables and views of the current snapshot that the reload no longer has
    pub to_be_dropped: BTreeMap<String, Schema>,
    /// Shared tables with identical definitions, by lower-cased table name
    pub unchanged: BTreeMap<String, BTreeSet<String>>,
    /// Schemas of the current snapshot absent from the reload
    pub removed_schemas: BTreeSet<String>,
}

impl SchemaDiff {
    pub fn compute(reload: &Database, current: &Database) -> Self {
        let mut diff = SchemaDiff::default();
        for (key, reloaded) in reload.schemas() {
            let Some(existing) = current.schemas().get(key) else {
                diff.to_be_added.insert(key.clone(), reloaded.clone());
                continue;
            };
            let (added, unchanged) = added_and_unchanged(reloaded, existing);
            if !added.is_empty() {
                diff.to_be_added.insert(key.clone(), added);
            }
            if !unchanged.is_empty() {
                diff.unchanged.insert(key.clone(), unchanged);
            }
            let dropped = missing_from(existing, reloaded);
            if !dropped.is_empty() {
                diff.to_be_dropped.insert(key.clone(), dropped);
            }
        }
        for (key, existing) in current.schemas() {
            if reload.schemas().contains_key(key) {
                continue;
            }
            diff.removed_schemas.insert(key.clone());
            if !existing.is_empty() {
                diff.to_be_dropped.insert(key.clone(), existing.clone());
            }
        }
        diff
    }

    /// True when the two snapshots are equivalent.
    pub fn is_empty(&self) -> bool {
        self.to_be_added.is_empty() && self.to_be_dropped.is_empty() && self.removed_schemas.is_empty()
    }
}

fn added_and_unchanged(reloaded: &Schema, existing: &Schema) -> (Schema, BTreeSet<String>) {
    let mut added = Schema::new(reloaded.name());
    let mut unchanged = BTreeSet::new();
    for (key, table) in reloaded.tables() {
        match existing.tables().get(key) {
            Some(current) if current.same_definition(table) => {
                unchanged.insert(key.clone());
            }
            _ => {
                added.put_table(table.clone());
            }
        }
    }
    for (key, view) in reloaded.views() {
        if !existing.views().get(key).is_some_and(|current| current.same_definition(view)) {
            added.put_view(view.clone());
        }
    }
    (added, unchanged)
}

fn missing_from(existing: &Schema, reloaded: &Schema) -> Schema {
    let mut dropped = Schema::new(existing.name());
    for (key, table) in existing.tables() {
        if !reloaded.tables().contains_key(key) {
            dropped.put_table(table.clone());
        }
    }
    for (key, view) in existing.views() {
        if !reloaded.views().contains_key(key) {
            dropped.put_view(view.clone());
        }
    }
    dropped
}

/// One persist operation produced by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOperation {
    /// Persist tables and views into the schema, keeping everything else.
    /// With nothing to persist, only the empty schema container is created.
    AlterSchema {
        schema: String,
        tables: Vec<Table>,
        views: Vec<View>,
    },
    /// Delete the tables and views, then persist them at a fresh version history.
    /// An empty schema container is never created.
    ReplaceTables {
        schema: String,
        tables: Vec<Table>,
        views: Vec<View>,
    },
    /// Delete the schema with everything below it.
    DropSchema { schema: String },
    /// Delete individual tables and views of a schema.
    DropTables {
        schema: String,
        tables: Vec<String>,
        views: Vec<String>,
    },
}

impl SchemaOperation {
    pub fn schema(&self) -> &str {
        match self {
            Self::AlterSchema { schema, .. }
            | Self::ReplaceTables { schema, .. }
            | Self::DropSchema { schema }
            | Self::DropTables { schema, .. } => schema,
        }
    }
}

fn contents(schema: &Schema) -> (Vec<Table>, Vec<View>) {
    (
        schema.tables().values().cloned().collect(),
        schema.views().values().cloned().collect(),
    )
}

fn drop_tables(key: &str, schema: &Schema) -> SchemaOperation {
    SchemaOperation::DropTables {
        schema: key.to_string(),
        tables: schema.tables().keys().cloned().collect(),
        views: schema.views().keys().cloned().collect(),
    }
}

/// Ordered persist operations reconciling stored state with a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    operations: Vec<SchemaOperation>,
}

impl ReconciliationPlan {
    /// Merge plan used when tables are altered.
    pub fn by_alter(diff: &SchemaDiff) -> Self {
        let mut operations = Vec::new();
        for (key, schema) in &diff.to_be_added {
            let (tables, views) = contents(schema);
            operations.push(SchemaOperation::AlterSchema {
                schema: key.clone(),
                tables,
                views,
            });
        }
        for (key, schema) in &diff.to_be_dropped {
            operations.push(drop_tables(key, schema));
        }
        Self { operations }
    }

    /// Replace plan used when tables or schemas are dropped.
    pub fn by_drop(diff: &SchemaDiff) -> Self {
        let mut operations = Vec::new();
        for (key, schema) in &diff.to_be_added {
            let (tables, views) = contents(schema);
            operations.push(SchemaOperation::ReplaceTables {
                schema: key.clone(),
                tables,
                views,
            });
        }
        for key in &diff.removed_schemas {
            operations.push(SchemaOperation::DropSchema { schema: key.clone() });
        }
        for (key, schema) in &diff.to_be_dropped {
            if !diff.removed_schemas.contains(key) {
                operations.push(drop_tables(key, schema));
            }
        }
        Self { operations }
    }

    pub fn operations(&self) -> &[SchemaOperation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl IntoIterator for ReconciliationPlan {
    type Item = SchemaOperation;
    type IntoIter = std::vec::IntoIter<SchemaOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}
