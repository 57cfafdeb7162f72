//! Cluster-wide rule configurations under `/rules`

use super::{load_rule_by_tag, persist_rule_tuples};
use crate::version::{PersistOutcome, VersionedUnitStore};
use crate::{Result, node};
use meta_model::{RecoveredConfigurations, RuleConfiguration, SwapperRegistry};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct GlobalRulePersistService {
    store: VersionedUnitStore,
    swappers: Arc<SwapperRegistry>,
}

impl GlobalRulePersistService {
    pub fn new(store: VersionedUnitStore, swappers: Arc<SwapperRegistry>) -> Self {
        Self { store, swappers }
    }

    /// Swap every configuration first, then write each tuple as its own unit.
    pub fn persist(&self, configs: &[RuleConfiguration]) -> Result<Vec<PersistOutcome>> {
        let tuples = self.swappers.swap_to_tuples(configs)?;
        tracing::debug!(rules = configs.len(), tuples = tuples.len(), "Persisting global rules");
        persist_rule_tuples(&self.store, node::GLOBAL_RULES_ROOT, &tuples)
    }

    /// Rebuild all global rules; variants that fail to decode are reported, not fatal.
    pub fn load(&self) -> Result<RecoveredConfigurations> {
        let tuples = self.store.units_under(node::GLOBAL_RULES_ROOT)?;
        Ok(self.swappers.swap_to_rule_configurations(&tuples))
    }

    pub fn load_by_tag(&self, tag: &str) -> Result<Option<RuleConfiguration>> {
        load_rule_by_tag(&self.store, &self.swappers, node::GLOBAL_RULES_ROOT, tag)
    }
}
