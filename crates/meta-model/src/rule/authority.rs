//! Authority (user and privilege) rule configuration

use super::{AlgorithmConfiguration, RuleScope, TypedRuleConfiguration};
use serde::{Deserialize, Serialize};

/// Cluster-wide users and the privilege provider that checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityRuleConfiguration {
    #[serde(default)]
    pub users: Vec<UserConfiguration>,
    pub privilege_provider: AlgorithmConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfiguration {
    pub user: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

impl Default for AuthorityRuleConfiguration {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            privilege_provider: AlgorithmConfiguration::new("ALL_PERMITTED"),
        }
    }
}

impl TypedRuleConfiguration for AuthorityRuleConfiguration {
    const VARIANT: &'static str = "authority";
    const SCOPE: RuleScope = RuleScope::Global;
}
