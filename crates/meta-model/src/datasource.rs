//! Data source pool properties and database configuration

use crate::rule::RuleConfiguration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Data source pool properties keyed by storage unit name.
///
/// Unit names are case-sensitive.
pub type DataSourceMap = BTreeMap<String, DataSourcePoolProperties>;

/// Default pool implementation name
pub const DEFAULT_POOL_CLASS: &str = "HikariDataSource";

/// Pool tuning properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolProperties {
    pub connection_timeout_ms: u64,
    pub idle_timeout_ms: u64,
    pub max_lifetime_ms: u64,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub read_only: bool,
}

impl Default for PoolProperties {
    fn default() -> Self {
        Self {
            connection_timeout_ms: 30_000,
            idle_timeout_ms: 60_000,
            max_lifetime_ms: 1_800_000,
            max_pool_size: 50,
            min_pool_size: 1,
            read_only: false,
        }
    }
}

/// Persisted pool configuration of one data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourcePoolProperties {
    #[serde(default = "default_pool_class")]
    pub pool_class_name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub pool: PoolProperties,
    /// Pool specific properties passed through untouched
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom: BTreeMap<String, String>,
}

fn default_pool_class() -> String {
    DEFAULT_POOL_CLASS.to_string()
}

impl DataSourcePoolProperties {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            pool_class_name: default_pool_class(),
            url: url.into(),
            username: None,
            password: None,
            pool: PoolProperties::default(),
            custom: BTreeMap::new(),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_pool(mut self, pool: PoolProperties) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }
}

/// Connection parameters of a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfiguration {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Pool parameters of a data source with durations resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfiguration {
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub read_only: bool,
    pub custom: BTreeMap<String, String>,
}

/// Connection-ready configuration rebuilt from stored pool properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfiguration {
    pub pool_class_name: String,
    pub connection: ConnectionConfiguration,
    pub pool: PoolConfiguration,
}

impl From<&DataSourcePoolProperties> for DataSourceConfiguration {
    fn from(props: &DataSourcePoolProperties) -> Self {
        Self {
            pool_class_name: props.pool_class_name.clone(),
            connection: ConnectionConfiguration {
                url: props.url.clone(),
                username: props.username.clone(),
                password: props.password.clone(),
            },
            pool: PoolConfiguration {
                connection_timeout: Duration::from_millis(props.pool.connection_timeout_ms),
                idle_timeout: Duration::from_millis(props.pool.idle_timeout_ms),
                max_lifetime: Duration::from_millis(props.pool.max_lifetime_ms),
                max_pool_size: props.pool.max_pool_size,
                min_pool_size: props.pool.min_pool_size,
                read_only: props.pool.read_only,
                custom: props.custom.clone(),
            },
        }
    }
}

/// A named storage unit of a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUnit {
    pub name: String,
    pub props: DataSourcePoolProperties,
}

impl StorageUnit {
    pub fn new(name: impl Into<String>, props: DataSourcePoolProperties) -> Self {
        Self {
            name: name.into(),
            props,
        }
    }
}

/// Configuration of one logical database as handed over by upstream loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseConfiguration {
    pub storage_units: Vec<StorageUnit>,
    pub rule_configurations: Vec<RuleConfiguration>,
}

impl DatabaseConfiguration {
    pub fn new(storage_units: Vec<StorageUnit>, rule_configurations: Vec<RuleConfiguration>) -> Self {
        Self {
            storage_units,
            rule_configurations,
        }
    }

    /// Pool properties keyed by unit name; on a name collision the first unit wins.
    pub fn pool_properties_map(&self) -> DataSourceMap {
        let mut result = DataSourceMap::new();
        for unit in &self.storage_units {
            result
                .entry(unit.name.clone())
                .or_insert_with(|| unit.props.clone());
        }
        result
    }

    /// True when neither storage units nor rules are configured.
    pub fn is_empty(&self) -> bool {
        self.storage_units.is_empty() && self.rule_configurations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_unit_wins_on_collision() {
        let config = DatabaseConfiguration::new(
            vec![
                StorageUnit::new("ds_0", DataSourcePoolProperties::new("jdbc:mysql://a/db")),
                StorageUnit::new("DS_0", DataSourcePoolProperties::new("jdbc:mysql://b/db")),
                StorageUnit::new("ds_0", DataSourcePoolProperties::new("jdbc:mysql://c/db")),
            ],
            Vec::new(),
        );

        let map = config.pool_properties_map();

        assert_eq!(map.len(), 2);
        assert_eq!(map["ds_0"].url, "jdbc:mysql://a/db");
        assert_eq!(map["DS_0"].url, "jdbc:mysql://b/db");
    }

    #[test]
    fn test_defaults_fill_missing_yaml_fields() {
        let props: DataSourcePoolProperties =
            serde_yaml::from_str("url: jdbc:mysql://127.0.0.1/db\npool:\n  max_pool_size: 8\n").unwrap();

        assert_eq!(props.pool_class_name, DEFAULT_POOL_CLASS);
        assert_eq!(props.pool.max_pool_size, 8);
        assert_eq!(props.pool.min_pool_size, 1);
    }

    #[test]
    fn test_configuration_resolves_durations() {
        let props = DataSourcePoolProperties::new("jdbc:mysql://127.0.0.1/db")
            .with_credentials("root", "secret")
            .with_custom("cachePrepStmts", "true");

        let config = DataSourceConfiguration::from(&props);

        assert_eq!(config.connection.username.as_deref(), Some("root"));
        assert_eq!(config.pool.connection_timeout, Duration::from_secs(30));
        assert_eq!(config.pool.custom["cachePrepStmts"], "true");
    }

    #[test]
    fn test_empty_configuration() {
        assert!(DatabaseConfiguration::default().is_empty());
    }
}
