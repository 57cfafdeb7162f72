//! End-to-end scenarios over the file-backed store
//!
//! Each scenario wires the façade to a `FileRepository` in a temporary
//! directory, the way a standalone deployment runs, and uses separate
//! service instances to stand in for separate cluster nodes.

use meta_core::config::PersistConfig;
use meta_core::{MetaDataPersistService, SchemaOperation};
use meta_model::rule::TransactionRuleConfiguration;
use meta_model::{ConfigurationProperties, Database, TypedRuleConfiguration};
use meta_store::FileRepository;
use meta_test_utils::fixtures;
use meta_test_utils::repository::TestStore;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Barrier};
use std::thread;

fn node(store: &TestStore) -> MetaDataPersistService {
    MetaDataPersistService::new(store.repository())
}

#[test]
fn test_configuration_survives_restart() {
    let store = TestStore::new();
    let rules = fixtures::database_rules();
    let config = fixtures::database_configuration(2, rules.clone());
    {
        let service = node(&store);
        service
            .persist_global_rule_configuration(
                &fixtures::global_rules(),
                &ConfigurationProperties::new().with("sql-show", "true"),
            )
            .unwrap();
        service
            .persist_configurations("sharding_db", &config, &fixtures::data_sources(2), &rules)
            .unwrap();
        service
            .persist_reload_database_by_alter("sharding_db", &fixtures::sharding_database(), &Database::new("sharding_db"))
            .unwrap();
    }

    let reopened = MetaDataPersistService::new(Arc::new(FileRepository::open(store.root()).unwrap()));

    assert_eq!(reopened.metadata().database().load_all_names().unwrap(), vec!["sharding_db"]);
    assert_eq!(reopened.load_global_rule_configurations().unwrap().configurations, fixtures::global_rules());
    assert_eq!(reopened.load_properties().unwrap().get("sql-show"), Some("true"));
    assert_eq!(reopened.load_database("sharding_db").unwrap().storage_units, config.storage_units);
    assert_eq!(reopened.load_schemas("sharding_db").unwrap(), fixtures::sharding_database());
}

#[test]
fn test_nodes_racing_on_global_rule() {
    let store = TestStore::new();
    let nodes = 4;
    let barrier = Arc::new(Barrier::new(nodes));
    let handles: Vec<_> = (0..nodes)
        .map(|i| {
            let service = node(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let rule = TransactionRuleConfiguration {
                    default_type: format!("TYPE_{}", i),
                    ..Default::default()
                };
                barrier.wait();
                service
                    .global_rule()
                    .persist(&[rule.to_configuration().unwrap()])
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let service = node(&store);
    let loaded = service.global_rule().load_by_tag("transaction").unwrap().unwrap();
    let active: TransactionRuleConfiguration = loaded.to_typed().unwrap();
    assert!(active.default_type.starts_with("TYPE_"));
}

#[test]
fn test_schema_evolution_across_nodes() {
    let store = TestStore::new();
    let writer = node(&store);
    let reader = node(&store);
    let current = Database::new("db").with_schema(fixtures::schema("public", &["t1", "t2"]));
    writer
        .persist_reload_database_by_alter("db", &current, &Database::new("db"))
        .unwrap();

    let stored = reader.load_schemas("db").unwrap();
    let reload = Database::new("db").with_schema(fixtures::schema("PUBLIC", &["T1", "t3"]));
    let plan = reader
        .persist_reload_database_by_alter("db", &reload, &stored)
        .unwrap();

    assert_eq!(plan.len(), 2);
    assert!(matches!(
        &plan.operations()[1],
        SchemaOperation::DropTables { tables, .. } if tables == &vec!["t2".to_string()]
    ));
    let tables: Vec<String> = writer
        .load_schemas("db")
        .unwrap()
        .schema("public")
        .unwrap()
        .tables()
        .keys()
        .cloned()
        .collect();
    assert_eq!(tables, vec!["t1", "t3"]);
}

#[test]
fn test_engine_configuration_from_file() {
    let store = TestStore::new();
    let path = store.root().join("persist.toml");
    std::fs::write(&path, "[version]\nskip_unchanged = false\nmax_attempts = 4\n").unwrap();
    let config = PersistConfig::load(&path).unwrap();
    let service = MetaDataPersistService::with_config(store.repository(), config);
    let props = ConfigurationProperties::new().with("sql-show", "false");

    service.props().persist(&props).unwrap();
    let outcome = service.props().persist(&props).unwrap();

    assert_eq!(outcome.version, 1);
    assert!(!outcome.unchanged);
}
