//! Decorator expanding single-table wildcards against live data sources

use super::{DecorationContext, RuleConfigurationDecorator};
use crate::rule::{RuleConfiguration, RuleVariant, SingleRuleConfiguration, TypedRuleConfiguration};
use crate::{Error, Result};
use std::collections::BTreeSet;

const ALL_TABLES: &str = "*.*";

/// Rewrites the `single` rule so it only references live data sources.
///
/// - `*.*` becomes `<ds>.*` for every live data source, in name order
/// - entries whose data source is not live are removed
/// - duplicates are removed, first occurrence kept
/// - a default data source that is not live is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleRuleDecorator;

impl SingleRuleDecorator {
    fn expand(context: &DecorationContext<'_>, tables: &[String]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut result = Vec::new();
        for entry in tables {
            let expanded: Vec<String> = if entry == ALL_TABLES {
                context
                    .data_sources
                    .keys()
                    .map(|name| format!("{}.*", name))
                    .collect()
            } else {
                match entry.split_once('.') {
                    Some((data_source, _)) if context.data_sources.contains_key(data_source) => {
                        vec![entry.clone()]
                    }
                    Some(("*", _)) => vec![entry.clone()],
                    _ => {
                        tracing::debug!(
                            database = context.database_name,
                            entry = entry.as_str(),
                            "Dropping single table entry for missing data source"
                        );
                        Vec::new()
                    }
                }
            };
            for table in expanded {
                if seen.insert(table.clone()) {
                    result.push(table);
                }
            }
        }
        result
    }
}

impl RuleConfigurationDecorator for SingleRuleDecorator {
    fn variant(&self) -> RuleVariant {
        RuleVariant::new(SingleRuleConfiguration::VARIANT)
    }

    fn decorate(
        &self,
        context: &DecorationContext<'_>,
        config: &RuleConfiguration,
    ) -> Result<RuleConfiguration> {
        let typed: SingleRuleConfiguration = config.to_typed()?;
        if let Some(default) = &typed.default_data_source {
            if !context.data_sources.contains_key(default) {
                return Err(Error::decoration_failed(
                    config.variant().as_str(),
                    format!("default data source '{}' is not configured", default),
                ));
            }
        }
        let decorated = SingleRuleConfiguration {
            tables: Self::expand(context, &typed.tables),
            default_data_source: typed.default_data_source,
        };
        config.with_typed_payload(&decorated)
    }
}
