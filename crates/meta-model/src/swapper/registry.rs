//! Precedence-ordered registry of rule swappers

use super::{
    ReadwriteSplittingRuleSwapper, RuleConfigurationSwapper, ShardingRuleSwapper, UnitRuleSwapper,
};
use crate::rule::{
    AuthorityRuleConfiguration, RuleConfiguration, RuleVariant, SingleRuleConfiguration,
    TransactionRuleConfiguration,
};
use crate::{Error, Result};
use meta_store::RepositoryTuple;
use meta_store::tuple::first_duplicate_path;
use std::sync::Arc;

/// Configurations rebuilt from persisted tuples.
///
/// A variant whose tuples are malformed is reported in `failures` and does
/// not prevent the other variants from being rebuilt.
#[derive(Debug, Default)]
pub struct RecoveredConfigurations {
    pub configurations: Vec<RuleConfiguration>,
    pub failures: Vec<Error>,
}

impl RecoveredConfigurations {
    /// True when every variant was rebuilt.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The configurations, or the first failure if any variant failed.
    pub fn into_result(self) -> Result<Vec<RuleConfiguration>> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(self.configurations),
        }
    }
}

/// Registry of swappers in deterministic precedence order.
///
/// Swappers are ordered by [`RuleConfigurationSwapper::order`]; equal orders
/// keep registration order.
///
/// # Example
///
/// ```
/// use meta_model::SwapperRegistry;
///
/// let registry = SwapperRegistry::with_builtins();
/// assert!(registry.contains("sharding"));
/// assert!(!registry.contains("shadow"));
/// ```
#[derive(Clone, Default)]
pub struct SwapperRegistry {
    swappers: Vec<Arc<dyn RuleConfigurationSwapper>>,
}

impl SwapperRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in swappers registered.
    ///
    /// Currently registers:
    /// - `sharding`
    /// - `readwrite_splitting`
    /// - `single`
    /// - `authority` (global)
    /// - `transaction` (global)
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ShardingRuleSwapper::new()));
        registry.register(Arc::new(ReadwriteSplittingRuleSwapper::new()));
        registry.register(Arc::new(UnitRuleSwapper::<SingleRuleConfiguration>::new(30)));
        registry.register(Arc::new(UnitRuleSwapper::<AuthorityRuleConfiguration>::new(100)));
        registry.register(Arc::new(UnitRuleSwapper::<TransactionRuleConfiguration>::new(110)));
        registry
    }

    /// Register a swapper at its precedence position.
    pub fn register(&mut self, swapper: Arc<dyn RuleConfigurationSwapper>) {
        let order = swapper.order();
        let position = self.swappers.partition_point(|existing| existing.order() <= order);
        self.swappers.insert(position, swapper);
    }

    /// Swapper claiming `variant`, first in precedence order.
    pub fn find(&self, variant: &RuleVariant) -> Option<&Arc<dyn RuleConfigurationSwapper>> {
        self.swappers.iter().find(|swapper| swapper.handles(variant))
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.find(&RuleVariant::new(variant)).is_some()
    }

    /// Registered variants in precedence order.
    pub fn variants(&self) -> Vec<RuleVariant> {
        self.swappers.iter().map(|swapper| swapper.variant()).collect()
    }

    pub fn len(&self) -> usize {
        self.swappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swappers.is_empty()
    }

    /// Resolve each configuration to its swapper, preserving input order.
    ///
    /// Fails with [`Error::UnsupportedConfigurationVariant`] on the first
    /// configuration no swapper claims.
    pub fn swap_to_yaml_rule_configurations<'a>(
        &self,
        configs: &'a [RuleConfiguration],
    ) -> Result<Vec<(&'a RuleConfiguration, Arc<dyn RuleConfigurationSwapper>)>> {
        configs
            .iter()
            .map(|config| {
                self.find(config.variant())
                    .map(|swapper| (config, Arc::clone(swapper)))
                    .ok_or_else(|| Error::UnsupportedConfigurationVariant {
                        variant: config.variant().to_string(),
                    })
            })
            .collect()
    }

    /// Swap a whole configuration set into one write batch.
    ///
    /// Every configuration is resolved and converted before anything is
    /// returned, and tuple paths must be unique across the batch.
    pub fn swap_to_tuples(&self, configs: &[RuleConfiguration]) -> Result<Vec<RepositoryTuple>> {
        let mut result = Vec::new();
        for (config, swapper) in self.swap_to_yaml_rule_configurations(configs)? {
            result.extend(swapper.swap_to_tuples(config)?);
        }
        if let Some(path) = first_duplicate_path(&result) {
            return Err(Error::DuplicateTuplePath {
                path: path.to_string(),
            });
        }
        Ok(result)
    }

    /// Rebuild configurations from a tuple set, one attempt per swapper.
    pub fn swap_to_rule_configurations(&self, tuples: &[RepositoryTuple]) -> RecoveredConfigurations {
        let mut result = RecoveredConfigurations::default();
        for swapper in &self.swappers {
            match swapper.swap_to_config(tuples) {
                Ok(Some(config)) => result.configurations.push(config),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(variant = %swapper.variant(), error = %e, "Failed to rebuild rule configuration");
                    result.failures.push(e);
                }
            }
        }
        result
    }
}

impl std::fmt::Debug for SwapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapperRegistry")
            .field("variants", &self.variants())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{RuleScope, TypedRuleConfiguration};

    struct FixedSwapper {
        tag: &'static str,
        order: i32,
    }

    impl RuleConfigurationSwapper for FixedSwapper {
        fn variant(&self) -> RuleVariant {
            RuleVariant::new(self.tag)
        }

        fn order(&self) -> i32 {
            self.order
        }

        fn swap_to_tuples(&self, _config: &RuleConfiguration) -> Result<Vec<RepositoryTuple>> {
            Ok(vec![RepositoryTuple::new(self.tag, "fixed")])
        }

        fn swap_to_config(&self, _tuples: &[RepositoryTuple]) -> Result<Option<RuleConfiguration>> {
            Ok(None)
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = SwapperRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_builtins_in_precedence_order() {
        let registry = SwapperRegistry::with_builtins();
        let variants: Vec<String> = registry.variants().iter().map(|v| v.to_string()).collect();
        assert_eq!(
            variants,
            vec!["sharding", "readwrite_splitting", "single", "authority", "transaction"]
        );
    }

    #[test]
    fn test_equal_order_keeps_registration_order() {
        let mut registry = SwapperRegistry::new();
        registry.register(Arc::new(FixedSwapper { tag: "b", order: 5 }));
        registry.register(Arc::new(FixedSwapper { tag: "a", order: 5 }));
        registry.register(Arc::new(FixedSwapper { tag: "c", order: 1 }));

        let variants: Vec<String> = registry.variants().iter().map(|v| v.to_string()).collect();
        assert_eq!(variants, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_unsupported_variant() {
        let registry = SwapperRegistry::with_builtins();
        let config = RuleConfiguration::new("shadow", RuleScope::Database, serde_yaml::Value::Null);

        let result = registry.swap_to_yaml_rule_configurations(std::slice::from_ref(&config));

        match result {
            Err(Error::UnsupportedConfigurationVariant { variant }) => assert_eq!(variant, "shadow"),
            other => panic!("expected unsupported variant, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_resolution_preserves_input_order() {
        let registry = SwapperRegistry::with_builtins();
        let configs = vec![
            TransactionRuleConfiguration::default().to_configuration().unwrap(),
            SingleRuleConfiguration::default().to_configuration().unwrap(),
        ];

        let resolved = registry.swap_to_yaml_rule_configurations(&configs).unwrap();

        let variants: Vec<String> = resolved.iter().map(|(_, s)| s.variant().to_string()).collect();
        assert_eq!(variants, vec!["transaction", "single"]);
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let registry = SwapperRegistry::with_builtins();
        let config = SingleRuleConfiguration::default().to_configuration().unwrap();

        let result = registry.swap_to_tuples(&[config.clone(), config]);

        assert!(matches!(result, Err(Error::DuplicateTuplePath { path }) if path == "single"));
    }

    #[test]
    fn test_partial_recovery() {
        let registry = SwapperRegistry::with_builtins();
        let tuples = vec![
            RepositoryTuple::new("single", "tables: ['ds_0.*']\n"),
            RepositoryTuple::new("transaction", "default_type: [oops"),
        ];

        let recovered = registry.swap_to_rule_configurations(&tuples);

        assert!(!recovered.is_complete());
        assert_eq!(recovered.configurations.len(), 1);
        assert_eq!(recovered.configurations[0].variant().as_str(), "single");
        assert_eq!(recovered.failures.len(), 1);
        assert!(recovered.into_result().is_err());
    }
}
