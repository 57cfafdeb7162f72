//! Single-table rule configuration

use super::{RuleScope, TypedRuleConfiguration};
use serde::{Deserialize, Serialize};

/// Tables that live on exactly one data source.
///
/// Entries are `<data source>.<table>`; either part may be `*`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SingleRuleConfiguration {
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_data_source: Option<String>,
}

impl TypedRuleConfiguration for SingleRuleConfiguration {
    const VARIANT: &'static str = "single";
    const SCOPE: RuleScope = RuleScope::Database;
}
