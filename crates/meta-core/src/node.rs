//! Persisted node layout
//!
//! ```text
//! /metadata/<db>                                     database marker
//! /metadata/<db>/data_sources/units/<unit>           storage unit pool properties
//! /metadata/<db>/data_sources/nodes/<node>           storage node pool properties
//! /metadata/<db>/rules/<rule tag>/...                database rules
//! /metadata/<db>/schemas/<schema>/tables/<table>     table metadata
//! /metadata/<db>/schemas/<schema>/views/<view>       view metadata
//! /rules/<rule tag>/...                              global rules
//! /props                                             global properties
//! <unit>/versions/<n>                                write-once version content
//! <unit>/active_version                              active version pointer
//! ```
//!
//! Schema, table and view names are lower-cased; data source names are kept
//! verbatim.

use crate::Result;
use meta_store::validate_segment;

pub const METADATA_ROOT: &str = "/metadata";
pub const GLOBAL_RULES_ROOT: &str = "/rules";
pub const PROPS_NODE: &str = "/props";

pub const VERSIONS: &str = "versions";
pub const ACTIVE_VERSION: &str = "active_version";

const DATA_SOURCES: &str = "data_sources";
const UNITS: &str = "units";
const NODES: &str = "nodes";
const RULES: &str = "rules";
const SCHEMAS: &str = "schemas";
const TABLES: &str = "tables";
const VIEWS: &str = "views";

/// Reject names that cannot be used as a single node segment.
pub fn check_name(name: &str) -> Result<()> {
    validate_segment(name).map_err(|reason| {
        meta_store::Error::InvalidPath {
            path: name.to_string(),
            reason,
        }
        .into()
    })
}

fn identifier(name: &str) -> String {
    name.to_lowercase()
}

pub fn database(database: &str) -> String {
    format!("{}/{}", METADATA_ROOT, database)
}

pub fn data_source_units(db: &str) -> String {
    format!("{}/{}/{}", database(db), DATA_SOURCES, UNITS)
}

pub fn data_source_unit(db: &str, unit: &str) -> String {
    format!("{}/{}", data_source_units(db), unit)
}

pub fn data_source_nodes(db: &str) -> String {
    format!("{}/{}/{}", database(db), DATA_SOURCES, NODES)
}

pub fn data_source_node(db: &str, node: &str) -> String {
    format!("{}/{}", data_source_nodes(db), node)
}

pub fn database_rules(db: &str) -> String {
    format!("{}/{}", database(db), RULES)
}

pub fn database_rule(db: &str, rule_path: &str) -> String {
    format!("{}/{}", database_rules(db), rule_path)
}

pub fn schemas(db: &str) -> String {
    format!("{}/{}", database(db), SCHEMAS)
}

pub fn schema(db: &str, schema: &str) -> String {
    format!("{}/{}", schemas(db), identifier(schema))
}

pub fn tables(db: &str, schema_name: &str) -> String {
    format!("{}/{}", schema(db, schema_name), TABLES)
}

pub fn table(db: &str, schema_name: &str, table: &str) -> String {
    format!("{}/{}", tables(db, schema_name), identifier(table))
}

pub fn views(db: &str, schema_name: &str) -> String {
    format!("{}/{}", schema(db, schema_name), VIEWS)
}

pub fn view(db: &str, schema_name: &str, view: &str) -> String {
    format!("{}/{}", views(db, schema_name), identifier(view))
}

pub fn global_rule(rule_path: &str) -> String {
    format!("{}/{}", GLOBAL_RULES_ROOT, rule_path)
}

pub fn versions(unit: &str) -> String {
    format!("{}/{}", unit, VERSIONS)
}

pub fn version(unit: &str, version: u64) -> String {
    format!("{}/{}", versions(unit), version)
}

pub fn active_version(unit: &str) -> String {
    format!("{}/{}", unit, ACTIVE_VERSION)
}
