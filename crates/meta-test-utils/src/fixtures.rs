//! Sample configuration and schema values.

use meta_model::rule::{
    AlgorithmConfiguration, AuthorityRuleConfiguration, KeyGenerateStrategyConfiguration,
    ReadwriteSplittingDataSourceGroup, ReadwriteSplittingRuleConfiguration,
    ShardingRuleConfiguration, ShardingTableRuleConfiguration, SingleRuleConfiguration,
    TransactionRuleConfiguration, UserConfiguration,
};
use meta_model::{
    Column, DataSourceMap, DataSourcePoolProperties, Database, DatabaseConfiguration, Index,
    RuleConfiguration, Schema, StorageUnit, Table, TypedRuleConfiguration, View,
};

/// Pool properties for a local MySQL data source named `name`.
pub fn pool_properties(name: &str) -> DataSourcePoolProperties {
    DataSourcePoolProperties::new(format!("jdbc:mysql://127.0.0.1:3306/{}", name))
        .with_credentials("root", "")
}

/// Data sources `ds_0` .. `ds_{count-1}`.
pub fn data_sources(count: usize) -> DataSourceMap {
    (0..count)
        .map(|i| {
            let name = format!("ds_{}", i);
            let props = pool_properties(&name);
            (name, props)
        })
        .collect()
}

/// Storage units matching [`data_sources`].
pub fn database_configuration(count: usize, rules: Vec<RuleConfiguration>) -> DatabaseConfiguration {
    let storage_units = data_sources(count)
        .into_iter()
        .map(|(name, props)| StorageUnit::new(name, props))
        .collect();
    DatabaseConfiguration::new(storage_units, rules)
}

pub fn sharding_rule() -> ShardingRuleConfiguration {
    ShardingRuleConfiguration {
        tables: [(
            "t_order".to_string(),
            ShardingTableRuleConfiguration {
                actual_data_nodes: Some("ds_${0..1}.t_order_${0..1}".to_string()),
                sharding_algorithm_name: Some("t_order_inline".to_string()),
                key_generate_strategy: Some(KeyGenerateStrategyConfiguration::new("order_id", "snowflake")),
            },
        )]
        .into(),
        sharding_algorithms: [(
            "t_order_inline".to_string(),
            AlgorithmConfiguration::new("INLINE").with_prop("algorithm-expression", "t_order_${order_id % 2}"),
        )]
        .into(),
        key_generators: [("snowflake".to_string(), AlgorithmConfiguration::new("SNOWFLAKE"))].into(),
        default_key_generate_strategy: None,
    }
}

pub fn readwrite_splitting_rule() -> ReadwriteSplittingRuleConfiguration {
    ReadwriteSplittingRuleConfiguration {
        data_source_groups: [(
            "readwrite_ds".to_string(),
            ReadwriteSplittingDataSourceGroup {
                write_data_source_name: "ds_0".to_string(),
                read_data_source_names: vec!["ds_1".to_string()],
                load_balancer_name: Some("round_robin".to_string()),
            },
        )]
        .into(),
        load_balancers: [("round_robin".to_string(), AlgorithmConfiguration::new("ROUND_ROBIN"))].into(),
    }
}

pub fn single_rule() -> SingleRuleConfiguration {
    SingleRuleConfiguration {
        tables: vec!["*.*".to_string()],
        default_data_source: Some("ds_0".to_string()),
    }
}

/// Sharding, read/write splitting and single rules, in registry order.
pub fn database_rules() -> Vec<RuleConfiguration> {
    vec![
        sharding_rule().to_configuration().expect("sharding rule encodes"),
        readwrite_splitting_rule()
            .to_configuration()
            .expect("readwrite splitting rule encodes"),
        single_rule().to_configuration().expect("single rule encodes"),
    ]
}

/// Authority and transaction rules, in registry order.
pub fn global_rules() -> Vec<RuleConfiguration> {
    let authority = AuthorityRuleConfiguration {
        users: vec![UserConfiguration {
            user: "root@%".to_string(),
            password: "root".to_string(),
            admin: true,
        }],
        ..Default::default()
    };
    vec![
        authority.to_configuration().expect("authority rule encodes"),
        TransactionRuleConfiguration::default()
            .to_configuration()
            .expect("transaction rule encodes"),
    ]
}

/// A small table with a generated primary key.
pub fn table(name: &str) -> Table {
    Table::new(name)
        .with_column(Column::new("id", "BIGINT").primary_key().generated())
        .with_column(Column::new("status", "VARCHAR"))
        .with_index(Index::new(format!("idx_{}_status", name), vec!["status".to_string()]))
}

/// A schema holding one [`table`] per name.
pub fn schema(name: &str, tables: &[&str]) -> Schema {
    tables
        .iter()
        .fold(Schema::new(name), |schema, table_name| schema.with_table(table(table_name)))
}

/// `sharding_db` with schema `public` holding `t_order`, `t_user` and a view.
pub fn sharding_database() -> Database {
    Database::new("sharding_db").with_schema(
        schema("public", &["t_order", "t_user"])
            .with_view(View::new("v_order", "SELECT * FROM t_order")),
    )
}
