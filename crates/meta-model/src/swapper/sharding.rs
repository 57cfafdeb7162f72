//! Sharding rule swapper
//!
//! Every table, algorithm and key generator is its own tuple so that
//! changing one table only rewrites that table's versioned unit:
//!
//! ```text
//! sharding/tables/<logic table>
//! sharding/sharding_algorithms/<name>
//! sharding/key_generators/<name>
//! sharding/default_key_generate_strategy
//! ```

use super::{RuleConfigurationSwapper, RuleNodePath};
use crate::rule::{RuleConfiguration, RuleVariant, ShardingRuleConfiguration, TypedRuleConfiguration};
use crate::{Error, Result};
use meta_store::RepositoryTuple;
use serde::Serialize;
use serde::de::DeserializeOwned;

const TABLES: &str = "tables";
const SHARDING_ALGORITHMS: &str = "sharding_algorithms";
const KEY_GENERATORS: &str = "key_generators";
const DEFAULT_KEY_GENERATE_STRATEGY: &str = "default_key_generate_strategy";

pub struct ShardingRuleSwapper {
    node_path: RuleNodePath,
}

impl ShardingRuleSwapper {
    pub const ORDER: i32 = 10;

    pub fn new() -> Self {
        Self {
            node_path: RuleNodePath::new(ShardingRuleConfiguration::VARIANT),
        }
    }
}

impl Default for ShardingRuleSwapper {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::Serialize {
        variant: ShardingRuleConfiguration::VARIANT.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(tuple: &RepositoryTuple, content: &str) -> Result<T> {
    serde_yaml::from_str(content)
        .map_err(|e| Error::malformed(ShardingRuleConfiguration::VARIANT, tuple.path(), e))
}

impl ShardingRuleSwapper {
    fn named(&self, item: &str, name: &str) -> Result<String> {
        self.node_path
            .named_item(item, name)
            .map_err(|message| Error::Serialize {
                variant: ShardingRuleConfiguration::VARIANT.to_string(),
                message,
            })
    }
}

impl RuleConfigurationSwapper for ShardingRuleSwapper {
    fn variant(&self) -> RuleVariant {
        RuleVariant::new(ShardingRuleConfiguration::VARIANT)
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn swap_to_tuples(&self, config: &RuleConfiguration) -> Result<Vec<RepositoryTuple>> {
        let typed: ShardingRuleConfiguration = config.to_typed()?;
        let mut result = Vec::new();
        for (name, table) in &typed.tables {
            result.push(RepositoryTuple::new(self.named(TABLES, name)?, encode(table)?));
        }
        for (name, algorithm) in &typed.sharding_algorithms {
            result.push(RepositoryTuple::new(
                self.named(SHARDING_ALGORITHMS, name)?,
                encode(algorithm)?,
            ));
        }
        for (name, generator) in &typed.key_generators {
            result.push(RepositoryTuple::new(self.named(KEY_GENERATORS, name)?, encode(generator)?));
        }
        if let Some(strategy) = &typed.default_key_generate_strategy {
            result.push(RepositoryTuple::new(
                self.node_path.unique_item(DEFAULT_KEY_GENERATE_STRATEGY),
                encode(strategy)?,
            ));
        }
        Ok(result)
    }

    fn swap_to_config(&self, tuples: &[RepositoryTuple]) -> Result<Option<RuleConfiguration>> {
        let mut config = ShardingRuleConfiguration::default();
        let mut found = false;
        for tuple in tuples.iter().filter(|t| self.node_path.owns(t.path())) {
            let Some(content) = tuple.content() else {
                continue;
            };
            let path = tuple.path();
            if let Some(name) = self.node_path.find_named_item(TABLES, path) {
                config.tables.insert(name.to_string(), decode(tuple, content)?);
            } else if let Some(name) = self.node_path.find_named_item(SHARDING_ALGORITHMS, path) {
                config
                    .sharding_algorithms
                    .insert(name.to_string(), decode(tuple, content)?);
            } else if let Some(name) = self.node_path.find_named_item(KEY_GENERATORS, path) {
                config.key_generators.insert(name.to_string(), decode(tuple, content)?);
            } else if self.node_path.is_unique_item(DEFAULT_KEY_GENERATE_STRATEGY, path) {
                config.default_key_generate_strategy = Some(decode(tuple, content)?);
            } else {
                tracing::debug!(path, "Ignoring unknown sharding rule node");
                continue;
            }
            found = true;
        }
        if !found {
            return Ok(None);
        }
        RuleConfiguration::from_typed(&config).map(Some)
    }
}
