//! Swappers between rule configurations and repository tuples
//!
//! A swapper is the only component that knows the persisted shape of its
//! variant. The [`SwapperRegistry`] holds one swapper per variant in a
//! deterministic precedence order.

mod node_path;
mod readwrite_splitting;
mod registry;
mod sharding;
mod unit;

pub use node_path::RuleNodePath;
pub use readwrite_splitting::ReadwriteSplittingRuleSwapper;
pub use registry::{RecoveredConfigurations, SwapperRegistry};
pub use sharding::ShardingRuleSwapper;
pub use unit::UnitRuleSwapper;

use crate::rule::{RuleConfiguration, RuleVariant};
use crate::Result;
use meta_store::RepositoryTuple;

/// Bidirectional converter for one rule configuration variant.
///
/// Tuple paths produced by a swapper are relative to the scope's rule root
/// and start with [`RuleConfigurationSwapper::rule_tag`].
pub trait RuleConfigurationSwapper: Send + Sync {
    /// Variant handled by this swapper.
    fn variant(&self) -> RuleVariant;

    /// Precedence; lower values come first.
    fn order(&self) -> i32;

    /// First path segment of every tuple this swapper owns.
    fn rule_tag(&self) -> String {
        self.variant().to_string()
    }

    /// Whether this swapper claims `variant`. Matching is exact.
    fn handles(&self, variant: &RuleVariant) -> bool {
        *variant == self.variant()
    }

    /// Convert a configuration into tuples. An empty result means nothing to persist.
    fn swap_to_tuples(&self, config: &RuleConfiguration) -> Result<Vec<RepositoryTuple>>;

    /// Rebuild a configuration from the full tuple set, ignoring tuples owned
    /// by other swappers. Returns `None` when no relevant tuple exists.
    fn swap_to_config(&self, tuples: &[RepositoryTuple]) -> Result<Option<RuleConfiguration>>;
}
