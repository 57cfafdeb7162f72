//! Sharding rule configuration

use super::{AlgorithmConfiguration, RuleScope, TypedRuleConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sharding rule for one logical database.
///
/// Tables are keyed by logic table name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShardingRuleConfiguration {
    #[serde(default)]
    pub tables: BTreeMap<String, ShardingTableRuleConfiguration>,
    #[serde(default)]
    pub sharding_algorithms: BTreeMap<String, AlgorithmConfiguration>,
    #[serde(default)]
    pub key_generators: BTreeMap<String, AlgorithmConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_key_generate_strategy: Option<KeyGenerateStrategyConfiguration>,
}

/// Routing for a single logic table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShardingTableRuleConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_data_nodes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharding_algorithm_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_generate_strategy: Option<KeyGenerateStrategyConfiguration>,
}

/// Column whose values are produced by a named key generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenerateStrategyConfiguration {
    pub column: String,
    pub key_generator_name: String,
}

impl KeyGenerateStrategyConfiguration {
    pub fn new(column: impl Into<String>, key_generator_name: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            key_generator_name: key_generator_name.into(),
        }
    }
}

impl ShardingRuleConfiguration {
    /// Whether the rule carries no tables, algorithms or default strategy.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.sharding_algorithms.is_empty()
            && self.key_generators.is_empty()
            && self.default_key_generate_strategy.is_none()
    }
}

impl TypedRuleConfiguration for ShardingRuleConfiguration {
    const VARIANT: &'static str = "sharding";
    const SCOPE: RuleScope = RuleScope::Database;
}
