//! Read/write-splitting rule configuration

use super::{AlgorithmConfiguration, RuleScope, TypedRuleConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read/write-splitting rule; data source groups are keyed by group name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadwriteSplittingRuleConfiguration {
    #[serde(default)]
    pub data_source_groups: BTreeMap<String, ReadwriteSplittingDataSourceGroup>,
    #[serde(default)]
    pub load_balancers: BTreeMap<String, AlgorithmConfiguration>,
}

/// One primary with its replicas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReadwriteSplittingDataSourceGroup {
    pub write_data_source_name: String,
    #[serde(default)]
    pub read_data_source_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_name: Option<String>,
}

impl ReadwriteSplittingRuleConfiguration {
    pub fn is_empty(&self) -> bool {
        self.data_source_groups.is_empty() && self.load_balancers.is_empty()
    }
}

impl TypedRuleConfiguration for ReadwriteSplittingRuleConfiguration {
    const VARIANT: &'static str = "readwrite_splitting";
    const SCOPE: RuleScope = RuleScope::Database;
}
