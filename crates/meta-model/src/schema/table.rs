//! Table structure: columns, indexes and constraints

use serde::{Deserialize, Serialize};

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    #[serde(default)]
    pub primary_key: bool,
    /// Value is generated by the database (auto increment)
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "visible_default")]
    pub visible: bool,
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default = "nullable_default")]
    pub nullable: bool,
}

fn visible_default() -> bool {
    true
}

fn nullable_default() -> bool {
    true
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            primary_key: false,
            generated: false,
            case_sensitive: false,
            visible: true,
            unsigned: false,
            nullable: true,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    fn normalized(&self) -> Self {
        Self {
            name: self.name.to_lowercase(),
            data_type: self.data_type.to_lowercase(),
            ..self.clone()
        }
    }
}

/// A table index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn normalized(&self) -> Self {
        Self {
            name: self.name.to_lowercase(),
            columns: self.columns.iter().map(|c| c.to_lowercase()).collect(),
            unique: self.unique,
        }
    }
}

/// A table constraint, e.g. a foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub referenced_table_name: String,
}

impl Constraint {
    pub fn new(name: impl Into<String>, referenced_table_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            referenced_table_name: referenced_table_name.into(),
        }
    }

    fn normalized(&self) -> Self {
        Self {
            name: self.name.to_lowercase(),
            referenced_table_name: self.referenced_table_name.to_lowercase(),
        }
    }
}

/// Table metadata as persisted per table node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<Index>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Constraint>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Column by name, ignoring case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Names of columns whose value the database generates.
    pub fn generated_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter(|c| c.generated).map(|c| c.name.as_str())
    }

    /// Copy with all identifiers lower-cased.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.to_lowercase(),
            columns: self.columns.iter().map(Column::normalized).collect(),
            indexes: self.indexes.iter().map(Index::normalized).collect(),
            constraints: self.constraints.iter().map(Constraint::normalized).collect(),
        }
    }

    /// Structural equality ignoring identifier case. Column order matters.
    pub fn same_definition(&self, other: &Table) -> bool {
        self.normalized() == other.normalized()
    }
}
