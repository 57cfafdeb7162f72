//! Swapper persisting a whole configuration as one tuple

use super::{RuleConfigurationSwapper, RuleNodePath};
use crate::rule::{RuleConfiguration, RuleVariant, TypedRuleConfiguration};
use crate::{Error, Result};
use meta_store::RepositoryTuple;
use std::marker::PhantomData;

/// Stores the full configuration of `T` at the tuple path `<tag>`.
///
/// Used for rules that are small and always change as a whole, such as the
/// global authority and transaction rules.
pub struct UnitRuleSwapper<T> {
    order: i32,
    node_path: RuleNodePath,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TypedRuleConfiguration> UnitRuleSwapper<T> {
    pub fn new(order: i32) -> Self {
        Self {
            order,
            node_path: RuleNodePath::new(T::VARIANT),
            _marker: PhantomData,
        }
    }
}

impl<T: TypedRuleConfiguration> RuleConfigurationSwapper for UnitRuleSwapper<T> {
    fn variant(&self) -> RuleVariant {
        RuleVariant::new(T::VARIANT)
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn swap_to_tuples(&self, config: &RuleConfiguration) -> Result<Vec<RepositoryTuple>> {
        let typed: T = config.to_typed()?;
        let content = serde_yaml::to_string(&typed).map_err(|e| Error::Serialize {
            variant: T::VARIANT.to_string(),
            message: e.to_string(),
        })?;
        Ok(vec![RepositoryTuple::new(self.node_path.root(), content)])
    }

    fn swap_to_config(&self, tuples: &[RepositoryTuple]) -> Result<Option<RuleConfiguration>> {
        let Some(tuple) = tuples.iter().find(|t| self.node_path.is_root(t.path())) else {
            return Ok(None);
        };
        let Some(content) = tuple.content() else {
            return Ok(None);
        };
        let typed: T =
            serde_yaml::from_str(content).map_err(|e| Error::malformed(T::VARIANT, tuple.path(), e))?;
        RuleConfiguration::from_typed(&typed).map(Some)
    }
}
