//! Read/write-splitting rule swapper
//!
//! ```text
//! readwrite_splitting/data_source_groups/<group>
//! readwrite_splitting/load_balancers/<name>
//! ```

use super::{RuleConfigurationSwapper, RuleNodePath};
use crate::rule::{
    ReadwriteSplittingRuleConfiguration, RuleConfiguration, RuleVariant, TypedRuleConfiguration,
};
use crate::{Error, Result};
use meta_store::RepositoryTuple;

const DATA_SOURCE_GROUPS: &str = "data_source_groups";
const LOAD_BALANCERS: &str = "load_balancers";

pub struct ReadwriteSplittingRuleSwapper {
    node_path: RuleNodePath,
}

impl ReadwriteSplittingRuleSwapper {
    pub const ORDER: i32 = 20;

    pub fn new() -> Self {
        Self {
            node_path: RuleNodePath::new(ReadwriteSplittingRuleConfiguration::VARIANT),
        }
    }

    fn tuple<T: serde::Serialize>(&self, item: &str, name: &str, value: &T) -> Result<RepositoryTuple> {
        let serialize_error = |message: String| Error::Serialize {
            variant: ReadwriteSplittingRuleConfiguration::VARIANT.to_string(),
            message,
        };
        let path = self.node_path.named_item(item, name).map_err(serialize_error)?;
        let content = serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))?;
        Ok(RepositoryTuple::new(path, content))
    }
}

impl Default for ReadwriteSplittingRuleSwapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleConfigurationSwapper for ReadwriteSplittingRuleSwapper {
    fn variant(&self) -> RuleVariant {
        RuleVariant::new(ReadwriteSplittingRuleConfiguration::VARIANT)
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn swap_to_tuples(&self, config: &RuleConfiguration) -> Result<Vec<RepositoryTuple>> {
        let typed: ReadwriteSplittingRuleConfiguration = config.to_typed()?;
        let groups = typed
            .data_source_groups
            .iter()
            .map(|(name, group)| self.tuple(DATA_SOURCE_GROUPS, name, group));
        let balancers = typed
            .load_balancers
            .iter()
            .map(|(name, balancer)| self.tuple(LOAD_BALANCERS, name, balancer));
        groups.chain(balancers).collect()
    }

    fn swap_to_config(&self, tuples: &[RepositoryTuple]) -> Result<Option<RuleConfiguration>> {
        let variant = ReadwriteSplittingRuleConfiguration::VARIANT;
        let mut config = ReadwriteSplittingRuleConfiguration::default();
        for tuple in tuples.iter().filter(|t| self.node_path.owns(t.path())) {
            let Some(content) = tuple.content() else {
                continue;
            };
            if let Some(name) = self.node_path.find_named_item(DATA_SOURCE_GROUPS, tuple.path()) {
                let group = serde_yaml::from_str(content)
                    .map_err(|e| Error::malformed(variant, tuple.path(), e))?;
                config.data_source_groups.insert(name.to_string(), group);
            } else if let Some(name) = self.node_path.find_named_item(LOAD_BALANCERS, tuple.path()) {
                let balancer = serde_yaml::from_str(content)
                    .map_err(|e| Error::malformed(variant, tuple.path(), e))?;
                config.load_balancers.insert(name.to_string(), balancer);
            }
        }
        if config.is_empty() {
            return Ok(None);
        }
        RuleConfiguration::from_typed(&config).map(Some)
    }
}
