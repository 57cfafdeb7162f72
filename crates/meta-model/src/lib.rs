//! Configuration and schema model for shard-meta.
//!
//! This crate defines the typed rule configurations persisted by the
//! metadata engine, the pluggable swappers that convert them to and from
//! repository tuples, the decorators applied before persistence, and the
//! schema structures that reconciliation works on.

pub mod datasource;
pub mod decorator;
pub mod error;
pub mod props;
pub mod rule;
pub mod schema;
pub mod swapper;

pub use datasource::{
    ConnectionConfiguration, DataSourceConfiguration, DataSourceMap, DataSourcePoolProperties,
    DatabaseConfiguration, PoolConfiguration, PoolProperties, StorageUnit,
};
pub use decorator::{
    DecorationContext, DecoratorRegistry, RuleConfigurationDecorator, SingleRuleDecorator,
};
pub use error::{Error, Result};
pub use props::ConfigurationProperties;
pub use rule::{RuleConfiguration, RuleScope, RuleVariant, TypedRuleConfiguration};
pub use schema::{Column, Constraint, Database, Index, Schema, Table, View};
pub use swapper::{RecoveredConfigurations, RuleConfigurationSwapper, SwapperRegistry};
