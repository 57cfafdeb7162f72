//! Transaction rule configuration

use super::{RuleScope, TypedRuleConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRuleConfiguration {
    #[serde(default = "default_transaction_type")]
    pub default_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_type: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: BTreeMap<String, String>,
}

fn default_transaction_type() -> String {
    "LOCAL".to_string()
}

impl Default for TransactionRuleConfiguration {
    fn default() -> Self {
        Self {
            default_type: default_transaction_type(),
            provider_type: None,
            props: BTreeMap::new(),
        }
    }
}

impl TypedRuleConfiguration for TransactionRuleConfiguration {
    const VARIANT: &'static str = "transaction";
    const SCOPE: RuleScope = RuleScope::Global;
}
