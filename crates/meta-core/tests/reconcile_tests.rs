//! Schema diff properties and reconciliation through the façade

use meta_core::{MetaDataPersistService, ReconciliationPlan, SchemaDiff, SchemaOperation};
use meta_model::{Database, Schema};
use meta_store::MemoryRepository;
use meta_test_utils::fixtures;
use pretty_assertions::assert_eq;
use proptest::collection::{btree_map, btree_set};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

fn snapshot(layout: &BTreeMap<String, BTreeSet<String>>, upper: bool) -> Database {
    let mut database = Database::new("db");
    for (schema, tables) in layout {
        let name = |n: &str| if upper { n.to_uppercase() } else { n.to_string() };
        let names: Vec<String> = tables.iter().map(|t| name(t)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        database.put_schema(fixtures::schema(&name(schema), &refs));
    }
    database
}

fn layout() -> impl Strategy<Value = BTreeMap<String, BTreeSet<String>>> {
    btree_map("[a-c]", btree_set("t_[a-e]", 0..4), 0..3)
}

fn table_keys(database: &Database) -> BTreeSet<(String, String)> {
    database
        .schemas()
        .iter()
        .flat_map(|(schema, value)| value.tables().keys().map(move |t| (schema.clone(), t.clone())))
        .collect()
}

proptest! {
    #[test]
    fn prop_identical_snapshots_differ_only_in_case(layout in layout()) {
        let diff = SchemaDiff::compute(&snapshot(&layout, true), &snapshot(&layout, false));
        prop_assert!(diff.is_empty());
    }

    #[test]
    fn prop_alter_plan_never_touches_unchanged_tables(current in layout(), reload in layout()) {
        let diff = SchemaDiff::compute(&snapshot(&reload, false), &snapshot(&current, false));
        let plan = ReconciliationPlan::by_alter(&diff);

        for operation in plan.operations() {
            let touched: Vec<String> = match operation {
                SchemaOperation::AlterSchema { tables, .. } => tables.iter().map(|t| t.name.clone()).collect(),
                SchemaOperation::DropTables { tables, .. } => tables.clone(),
                other => panic!("alter plan contains {:?}", other),
            };
            let unchanged = diff.unchanged.get(operation.schema()).cloned().unwrap_or_default();
            for table in touched {
                prop_assert!(!unchanged.contains(&table));
            }
        }
    }

    #[test]
    fn prop_alter_reconciles_table_set(current in layout(), reload in layout()) {
        let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
        let current = snapshot(&current, false);
        let reload = snapshot(&reload, false);
        service.persist_reload_database_by_alter("db", &current, &Database::new("db")).unwrap();

        service.persist_reload_database_by_alter("db", &reload, &current).unwrap();

        let stored = service.load_schemas("db").unwrap();
        let expected: BTreeSet<_> = table_keys(&reload);
        prop_assert_eq!(table_keys(&stored), expected);
    }

    #[test]
    fn prop_drop_reconciles_schema_set(current in layout(), reload in layout()) {
        let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
        let current = snapshot(&current, false);
        let reload = snapshot(&reload, false);
        service.persist_reload_database_by_alter("db", &current, &Database::new("db")).unwrap();

        service.persist_reload_database_by_drop("db", &reload, &current).unwrap();

        let stored = service.load_schemas("db").unwrap();
        prop_assert_eq!(table_keys(&stored), table_keys(&reload));
        for schema in stored.schemas().keys() {
            prop_assert!(reload.contains_schema(schema));
        }
    }
}

#[test]
fn test_reload_by_alter_keeps_untouched_tables() {
    let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
    let current = Database::new("db").with_schema(fixtures::schema("schema_a", &["t1", "t2"]));
    service
        .persist_reload_database_by_alter("db", &current, &Database::new("db"))
        .unwrap();
    let t1_unit = "/metadata/db/schemas/schema_a/tables/t1";
    let t1_before = service.metadata().table().load("db", "schema_a", "t1").unwrap();
    let reload = Database::new("db").with_schema(fixtures::schema("schema_a", &["t1", "t3"]));

    let plan = service
        .persist_reload_database_by_alter("db", &reload, &current)
        .unwrap();

    assert_eq!(plan.len(), 2);
    let stored = service.load_schemas("db").unwrap();
    let schema = stored.schema("schema_a").unwrap();
    assert_eq!(
        schema.tables().keys().collect::<Vec<_>>(),
        vec!["t1", "t3"]
    );
    assert_eq!(schema.table("t1").cloned(), t1_before);
    assert!(service.repository().get(&format!("{}/versions/1", t1_unit)).unwrap().is_none());
}

#[test]
fn test_reload_by_drop_removes_schema() {
    let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
    let current = fixtures::sharding_database().with_schema(fixtures::schema("archive", &["t_log"]));
    service
        .persist_reload_database_by_alter("sharding_db", &current, &Database::new("sharding_db"))
        .unwrap();

    let plan = service
        .persist_reload_database_by_drop("sharding_db", &fixtures::sharding_database(), &current)
        .unwrap();

    assert_eq!(
        plan.operations(),
        &[SchemaOperation::DropSchema {
            schema: "archive".to_string()
        }]
    );
    let stored = service.load_schemas("sharding_db").unwrap();
    assert_eq!(stored, fixtures::sharding_database());
}

#[test]
fn test_empty_new_schema_is_created() {
    let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
    let reload = Database::new("db").with_schema(Schema::new("fresh"));

    service
        .persist_reload_database_by_alter("db", &reload, &Database::new("db"))
        .unwrap();

    assert_eq!(service.metadata().schema().load_all_names("db").unwrap(), vec!["fresh"]);
}

#[test]
fn test_reload_by_drop_does_not_create_empty_schema() {
    let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
    let reload = fixtures::sharding_database().with_schema(Schema::new("fresh"));

    let plan = service
        .persist_reload_database_by_drop("sharding_db", &reload, &Database::new("sharding_db"))
        .unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(service.metadata().schema().load_all_names("sharding_db").unwrap(), vec!["public"]);
    assert_eq!(service.load_schemas("sharding_db").unwrap(), fixtures::sharding_database());
}
