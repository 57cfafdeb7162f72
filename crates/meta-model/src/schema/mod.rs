//! Schema model used by reconciliation and metadata persistence
//!
//! Identifiers are SQL identifiers and therefore case-insensitive: tables,
//! views and schemas are keyed by their lower-cased name, while each value
//! keeps the name it was created with.

mod table;

pub use table::{Column, Constraint, Index, Table};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A view and its defining query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub name: String,
    pub view_definition: String,
}

impl View {
    pub fn new(name: impl Into<String>, view_definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_definition: view_definition.into(),
        }
    }

    /// Equal names ignoring case and equal definitions ignoring surrounding whitespace.
    pub fn same_definition(&self, other: &View) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.view_definition.trim() == other.view_definition.trim()
    }
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

/// A schema snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    tables: BTreeMap<String, Table>,
    views: BTreeMap<String, View>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: BTreeMap::new(),
            views: BTreeMap::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.put_table(table);
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.put_view(view);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace a table, returning the replaced one.
    pub fn put_table(&mut self, table: Table) -> Option<Table> {
        self.tables.insert(key(&table.name), table)
    }

    pub fn remove_table(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(&key(name))
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(&key(name))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(&key(name))
    }

    /// Tables keyed by lower-cased name.
    pub fn tables(&self) -> &BTreeMap<String, Table> {
        &self.tables
    }

    pub fn put_view(&mut self, view: View) -> Option<View> {
        self.views.insert(key(&view.name), view)
    }

    pub fn remove_view(&mut self, name: &str) -> Option<View> {
        self.views.remove(&key(name))
    }

    pub fn view(&self, name: &str) -> Option<&View> {
        self.views.get(&key(name))
    }

    /// Views keyed by lower-cased name.
    pub fn views(&self) -> &BTreeMap<String, View> {
        &self.views
    }

    /// True when the schema has neither tables nor views.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.views.is_empty()
    }
}

/// A logical database snapshot: its schemas by lower-cased name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    name: String,
    schemas: BTreeMap<String, Schema>,
}

impl Database {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schemas: BTreeMap::new(),
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.put_schema(schema);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn put_schema(&mut self, schema: Schema) -> Option<Schema> {
        self.schemas.insert(key(schema.name()), schema)
    }

    pub fn schema(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(&key(name))
    }

    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(&key(name))
    }

    pub fn schemas(&self) -> &BTreeMap<String, Schema> {
        &self.schemas
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
