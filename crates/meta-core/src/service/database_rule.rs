//! Per-database rule configurations under `/metadata/<db>/rules`

use super::{load_rule_by_tag, persist_rule_tuples};
use crate::version::{PersistOutcome, VersionedUnitStore};
use crate::{Result, node};
use meta_model::{
    DataSourceMap, DecorationContext, DecoratorRegistry, RecoveredConfigurations,
    RuleConfiguration, SwapperRegistry,
};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DatabaseRulePersistService {
    store: VersionedUnitStore,
    swappers: Arc<SwapperRegistry>,
    decorators: Arc<DecoratorRegistry>,
}

impl DatabaseRulePersistService {
    pub fn new(
        store: VersionedUnitStore,
        swappers: Arc<SwapperRegistry>,
        decorators: Arc<DecoratorRegistry>,
    ) -> Self {
        Self {
            store,
            swappers,
            decorators,
        }
    }

    /// Decorate and persist the rule set of `database`.
    ///
    /// Decoration and swapping of the whole set complete before the first
    /// write, so a failing rule leaves every rule of the batch untouched.
    pub fn persist(
        &self,
        database: &str,
        data_sources: &DataSourceMap,
        rules: &[RuleConfiguration],
    ) -> Result<Vec<PersistOutcome>> {
        node::check_name(database)?;
        let context = DecorationContext {
            database_name: database,
            data_sources,
            rules,
        };
        let decorated = self.decorators.decorate_all(&context)?;
        let tuples = self.swappers.swap_to_tuples(&decorated)?;
        tracing::debug!(database, rules = rules.len(), tuples = tuples.len(), "Persisting database rules");
        persist_rule_tuples(&self.store, &node::database_rules(database), &tuples)
    }

    /// Rebuild the rules of `database`; variants that fail to decode are reported.
    pub fn load(&self, database: &str) -> Result<RecoveredConfigurations> {
        let tuples = self.store.units_under(&node::database_rules(database))?;
        Ok(self.swappers.swap_to_rule_configurations(&tuples))
    }

    pub fn load_by_tag(&self, database: &str, tag: &str) -> Result<Option<RuleConfiguration>> {
        load_rule_by_tag(&self.store, &self.swappers, &node::database_rules(database), tag)
    }

    /// Remove every unit of one rule from `database`.
    pub fn delete(&self, database: &str, tag: &str) -> Result<()> {
        node::check_name(tag)?;
        self.store.delete(&node::database_rule(database, tag))
    }
}
