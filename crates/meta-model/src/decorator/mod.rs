//! Rule configuration decoration
//!
//! A decorator rewrites a database rule configuration using live runtime
//! context right before it is persisted. Decorators are bound to a variant
//! tag; lookup falls back from the most specific tag to its supertypes.

mod single;

pub use single::SingleRuleDecorator;

use crate::datasource::DataSourceMap;
use crate::rule::{RuleConfiguration, RuleVariant};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Live runtime context handed to decorators. Read-only.
#[derive(Debug, Clone, Copy)]
pub struct DecorationContext<'a> {
    pub database_name: &'a str,
    pub data_sources: &'a DataSourceMap,
    pub rules: &'a [RuleConfiguration],
}

/// Rewrites one rule configuration variant before persistence.
///
/// Implementations must be pure functions of the context and the
/// configuration, so persisting an unchanged rule set twice yields identical
/// content.
pub trait RuleConfigurationDecorator: Send + Sync {
    /// Variant (and implicitly its subtypes) this decorator is bound to.
    fn variant(&self) -> RuleVariant;

    fn decorate(
        &self,
        context: &DecorationContext<'_>,
        config: &RuleConfiguration,
    ) -> Result<RuleConfiguration>;
}

/// Registry of decorators keyed by variant tag.
#[derive(Clone, Default)]
pub struct DecoratorRegistry {
    decorators: BTreeMap<RuleVariant, Arc<dyn RuleConfigurationDecorator>>,
}

impl DecoratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `single` decorator.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SingleRuleDecorator));
        registry
    }

    /// Bind a decorator to its variant, replacing any previous binding.
    pub fn register(&mut self, decorator: Arc<dyn RuleConfigurationDecorator>) {
        self.decorators.insert(decorator.variant(), decorator);
    }

    /// Most specific decorator bound to `variant` or one of its supertypes.
    pub fn find(&self, variant: &RuleVariant) -> Option<&Arc<dyn RuleConfigurationDecorator>> {
        variant
            .lineage()
            .iter()
            .find_map(|candidate| self.decorators.get(candidate))
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Decorate one configuration; configurations without a decorator pass through.
    ///
    /// Any decorator error is reported as [`Error::DecorationFailed`].
    pub fn decorate(
        &self,
        context: &DecorationContext<'_>,
        config: &RuleConfiguration,
    ) -> Result<RuleConfiguration> {
        let Some(decorator) = self.find(config.variant()) else {
            return Ok(config.clone());
        };
        decorator.decorate(context, config).map_err(|e| match e {
            Error::DecorationFailed { .. } => e,
            other => Error::decoration_failed(config.variant().as_str(), other),
        })
    }

    /// Decorate every rule of the context, all or nothing.
    pub fn decorate_all(&self, context: &DecorationContext<'_>) -> Result<Vec<RuleConfiguration>> {
        context
            .rules
            .iter()
            .map(|config| self.decorate(context, config))
            .collect()
    }
}

impl std::fmt::Debug for DecoratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoratorRegistry")
            .field("variants", &self.decorators.keys().collect::<Vec<_>>())
            .finish()
    }
}
