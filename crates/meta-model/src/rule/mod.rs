//! Rule configuration envelope
//!
//! Every rule configuration travels through the engine as a
//! [`RuleConfiguration`]: a variant tag, a scope and an opaque YAML payload.
//! Only the plugins registered for a tag interpret its payload. Typed
//! configurations convert in and out of the envelope through
//! [`TypedRuleConfiguration`].
//!
//! Variant tags are hierarchical with `.` as separator: `single.compatible`
//! is a subtype of `single`.

mod algorithm;
mod authority;
mod readwrite_splitting;
mod sharding;
mod single;
mod transaction;

pub use algorithm::AlgorithmConfiguration;
pub use authority::{AuthorityRuleConfiguration, UserConfiguration};
pub use readwrite_splitting::{ReadwriteSplittingDataSourceGroup, ReadwriteSplittingRuleConfiguration};
pub use sharding::{
    KeyGenerateStrategyConfiguration, ShardingRuleConfiguration, ShardingTableRuleConfiguration,
};
pub use single::SingleRuleConfiguration;
pub use transaction::TransactionRuleConfiguration;

use crate::{Error, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Hierarchical variant tag of a rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleVariant(String);

impl RuleVariant {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The direct supertype, e.g. `single` for `single.compatible`.
    pub fn parent(&self) -> Option<RuleVariant> {
        self.0.rfind('.').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// This variant followed by all of its supertypes, most specific first.
    pub fn lineage(&self) -> Vec<RuleVariant> {
        let mut result = vec![self.clone()];
        let mut current = self.parent();
        while let Some(variant) = current {
            current = variant.parent();
            result.push(variant);
        }
        result
    }

    /// Whether this variant equals `ancestor` or is one of its subtypes.
    pub fn is_a(&self, ancestor: &str) -> bool {
        self.0 == ancestor
            || self
                .0
                .strip_prefix(ancestor)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleVariant {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Where a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleScope {
    /// Cluster-wide rule persisted under `/rules`
    Global,
    /// Rule owned by a single logical database
    Database,
}

/// Tagged envelope for any rule configuration.
///
/// Immutable once constructed: decoration and updates produce a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfiguration {
    variant: RuleVariant,
    scope: RuleScope,
    payload: serde_yaml::Value,
}

impl RuleConfiguration {
    pub fn new(variant: impl Into<RuleVariant>, scope: RuleScope, payload: serde_yaml::Value) -> Self {
        Self {
            variant: variant.into(),
            scope,
            payload,
        }
    }

    /// Wrap a typed configuration.
    pub fn from_typed<T: TypedRuleConfiguration>(config: &T) -> Result<Self> {
        let payload = serde_yaml::to_value(config).map_err(|e| Error::Serialize {
            variant: T::VARIANT.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(T::VARIANT, T::SCOPE, payload))
    }

    /// Interpret the payload as `T`.
    ///
    /// Subtypes of `T::VARIANT` are accepted because they share its payload shape.
    pub fn to_typed<T: TypedRuleConfiguration>(&self) -> Result<T> {
        if !self.variant.is_a(T::VARIANT) {
            return Err(Error::UnsupportedConfigurationVariant {
                variant: self.variant.to_string(),
            });
        }
        serde_yaml::from_value(self.payload.clone())
            .map_err(|e| Error::malformed(self.variant.as_str(), self.variant.as_str(), e))
    }

    /// A copy of this configuration with a new payload and the same variant.
    pub fn with_typed_payload<T: TypedRuleConfiguration>(&self, config: &T) -> Result<Self> {
        let encoded = Self::from_typed(config)?;
        Ok(Self {
            variant: self.variant.clone(),
            scope: self.scope,
            payload: encoded.payload,
        })
    }

    pub fn variant(&self) -> &RuleVariant {
        &self.variant
    }

    pub fn scope(&self) -> RuleScope {
        self.scope
    }

    pub fn payload(&self) -> &serde_yaml::Value {
        &self.payload
    }

    /// The payload as a JSON value, for callers that expose configuration over JSON APIs.
    pub fn payload_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.payload).map_err(|e| Error::Serialize {
            variant: self.variant.to_string(),
            message: e.to_string(),
        })
    }
}

/// A concrete, strongly typed rule configuration.
pub trait TypedRuleConfiguration: Serialize + DeserializeOwned {
    /// Variant tag of this configuration
    const VARIANT: &'static str;

    /// Scope the rule applies to
    const SCOPE: RuleScope;

    /// Wrap `self` in an envelope.
    fn to_configuration(&self) -> Result<RuleConfiguration> {
        RuleConfiguration::from_typed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_variant_lineage() {
        let variant = RuleVariant::new("single.compatible.legacy");
        let lineage: Vec<String> = variant.lineage().iter().map(|v| v.to_string()).collect();
        assert_eq!(lineage, vec!["single.compatible.legacy", "single.compatible", "single"]);
        assert_eq!(RuleVariant::new("single").parent(), None);
    }

    #[rstest]
    #[case("single", "single", true)]
    #[case("single.compatible", "single", true)]
    #[case("singleton", "single", false)]
    #[case("single", "single.compatible", false)]
    fn test_is_a(#[case] variant: &str, #[case] ancestor: &str, #[case] expected: bool) {
        assert_eq!(RuleVariant::new(variant).is_a(ancestor), expected);
    }

    #[test]
    fn test_typed_round_trip() {
        let config = SingleRuleConfiguration {
            tables: vec!["ds_0.t_user".to_string()],
            default_data_source: Some("ds_0".to_string()),
        };
        let envelope = config.to_configuration().unwrap();
        assert_eq!(envelope.variant().as_str(), "single");
        assert_eq!(envelope.scope(), RuleScope::Database);
        assert_eq!(envelope.to_typed::<SingleRuleConfiguration>().unwrap(), config);
    }

    #[test]
    fn test_to_typed_rejects_other_variant() {
        let envelope = TransactionRuleConfiguration::default().to_configuration().unwrap();
        let result = envelope.to_typed::<SingleRuleConfiguration>();
        assert!(matches!(result, Err(Error::UnsupportedConfigurationVariant { .. })));
    }

    #[test]
    fn test_subtype_keeps_variant_on_new_payload() {
        let payload = serde_yaml::to_value(SingleRuleConfiguration::default()).unwrap();
        let envelope = RuleConfiguration::new("single.compatible", RuleScope::Database, payload);
        let typed: SingleRuleConfiguration = envelope.to_typed().unwrap();
        let updated = envelope
            .with_typed_payload(&SingleRuleConfiguration {
                tables: vec!["*.*".to_string()],
                ..typed
            })
            .unwrap();
        assert_eq!(updated.variant().as_str(), "single.compatible");
    }

    #[test]
    fn test_payload_json() {
        let envelope = TransactionRuleConfiguration::default().to_configuration().unwrap();
        let json = envelope.payload_json().unwrap();
        assert_eq!(json["default_type"], "LOCAL");
    }
}
