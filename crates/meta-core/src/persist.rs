//! The metadata persistence façade

use crate::config::PersistConfig;
use crate::reconcile::{ReconciliationPlan, SchemaDiff};
use crate::service::{
    DataSourceNodePersistService, DataSourceUnitPersistService, DatabaseMetaDataPersistFacade,
    DatabaseRulePersistService, GlobalRulePersistService, PropertiesPersistService,
};
use crate::version::VersionedUnitStore;
use crate::Result;
use meta_model::{
    ConfigurationProperties, DataSourceConfiguration, DataSourceMap, Database,
    DatabaseConfiguration, DecoratorRegistry, RecoveredConfigurations, RuleConfiguration,
    SwapperRegistry,
};
use meta_store::PersistRepository;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Single entry point for persisting and loading cluster metadata.
///
/// The service holds no cached state: every load re-reads the active versions
/// from the repository.
///
/// # Example
///
/// ```
/// use meta_core::MetaDataPersistService;
/// use meta_model::{ConfigurationProperties, DataSourceMap, DatabaseConfiguration};
/// use meta_store::MemoryRepository;
/// use std::sync::Arc;
///
/// let service = MetaDataPersistService::new(Arc::new(MemoryRepository::new()));
/// service
///     .persist_configurations("foo_db", &DatabaseConfiguration::default(), &DataSourceMap::new(), &[])
///     .unwrap();
///
/// assert!(service.metadata().database().exists("foo_db").unwrap());
/// assert_eq!(service.load_properties().unwrap(), ConfigurationProperties::default());
/// ```
#[derive(Clone)]
pub struct MetaDataPersistService {
    repository: Arc<dyn PersistRepository>,
    global_rule: GlobalRulePersistService,
    props: PropertiesPersistService,
    database_rule: DatabaseRulePersistService,
    data_source_unit: DataSourceUnitPersistService,
    data_source_node: DataSourceNodePersistService,
    metadata: DatabaseMetaDataPersistFacade,
}

impl MetaDataPersistService {
    /// Create a service with default configuration and the built-in plugins.
    pub fn new(repository: Arc<dyn PersistRepository>) -> Self {
        Self::with_registries(
            repository,
            PersistConfig::default(),
            Arc::new(SwapperRegistry::with_builtins()),
            Arc::new(DecoratorRegistry::with_builtins()),
        )
    }

    pub fn with_config(repository: Arc<dyn PersistRepository>, config: PersistConfig) -> Self {
        Self::with_registries(
            repository,
            config,
            Arc::new(SwapperRegistry::with_builtins()),
            Arc::new(DecoratorRegistry::with_builtins()),
        )
    }

    pub fn with_registries(
        repository: Arc<dyn PersistRepository>,
        config: PersistConfig,
        swappers: Arc<SwapperRegistry>,
        decorators: Arc<DecoratorRegistry>,
    ) -> Self {
        let store = VersionedUnitStore::new(repository.clone(), config.version);
        Self {
            global_rule: GlobalRulePersistService::new(store.clone(), swappers.clone()),
            props: PropertiesPersistService::new(store.clone()),
            database_rule: DatabaseRulePersistService::new(store.clone(), swappers, decorators),
            data_source_unit: DataSourceUnitPersistService::new(store.clone()),
            data_source_node: DataSourceNodePersistService::new(store.clone()),
            metadata: DatabaseMetaDataPersistFacade::new(repository.clone(), store),
            repository,
        }
    }

    pub fn repository(&self) -> &Arc<dyn PersistRepository> {
        &self.repository
    }

    pub fn global_rule(&self) -> &GlobalRulePersistService {
        &self.global_rule
    }

    pub fn props(&self) -> &PropertiesPersistService {
        &self.props
    }

    pub fn database_rule(&self) -> &DatabaseRulePersistService {
        &self.database_rule
    }

    pub fn data_source_unit(&self) -> &DataSourceUnitPersistService {
        &self.data_source_unit
    }

    pub fn data_source_node(&self) -> &DataSourceNodePersistService {
        &self.data_source_node
    }

    pub fn metadata(&self) -> &DatabaseMetaDataPersistFacade {
        &self.metadata
    }

    /// Persist global rules and properties as independent units.
    ///
    /// Both writes are attempted; a failure of one does not undo the other.
    /// The first error is returned.
    pub fn persist_global_rule_configuration(
        &self,
        rules: &[RuleConfiguration],
        props: &ConfigurationProperties,
    ) -> Result<()> {
        tracing::info!(rules = rules.len(), props = props.len(), "Persisting global configuration");
        let rules_result = self.global_rule.persist(rules).map(|_| ());
        let props_result = self.props.persist(props).map(|_| ());
        rules_result.and(props_result)
    }

    /// Persist the configuration of one database.
    ///
    /// When `database_config` has neither storage units nor rules only the
    /// database marker is written, whatever the live `rules` hold.
    /// Otherwise storage units are persisted first, then the decorated rule
    /// set; a rule failure therefore leaves the storage units written.
    pub fn persist_configurations(
        &self,
        database: &str,
        database_config: &DatabaseConfiguration,
        data_sources: &DataSourceMap,
        rules: &[RuleConfiguration],
    ) -> Result<()> {
        self.metadata.database().add(database)?;
        if database_config.is_empty() {
            tracing::info!(database, "Registered empty database");
            return Ok(());
        }
        tracing::info!(
            database,
            storage_units = database_config.storage_units.len(),
            rules = rules.len(),
            "Persisting database configuration"
        );
        self.data_source_unit
            .persist(database, &database_config.pool_properties_map())?;
        self.database_rule.persist(database, data_sources, rules)?;
        Ok(())
    }

    /// Connection-ready configuration per storage unit name.
    pub fn load_data_source_configurations(
        &self,
        database: &str,
    ) -> Result<BTreeMap<String, DataSourceConfiguration>> {
        Ok(self
            .data_source_unit
            .load(database)?
            .iter()
            .map(|(name, props)| (name.clone(), DataSourceConfiguration::from(props)))
            .collect())
    }

    pub fn load_global_rule_configurations(&self) -> Result<RecoveredConfigurations> {
        self.global_rule.load()
    }

    pub fn load_properties(&self) -> Result<ConfigurationProperties> {
        self.props.load()
    }

    pub fn load_database_rule_configurations(&self, database: &str) -> Result<RecoveredConfigurations> {
        self.database_rule.load(database)
    }

    /// Stored storage units and rules of `database` as one configuration.
    pub fn load_database(&self, database: &str) -> Result<DatabaseConfiguration> {
        let storage_units = self
            .data_source_unit
            .load(database)?
            .into_iter()
            .map(|(name, props)| meta_model::StorageUnit::new(name, props))
            .collect();
        let rules = self.database_rule.load(database)?.into_result()?;
        Ok(DatabaseConfiguration::new(storage_units, rules))
    }

    /// Stored schema structure of `database`.
    pub fn load_schemas(&self, database: &str) -> Result<Database> {
        self.metadata.load_schemas(database)
    }

    /// Reconcile stored schemas with `reload` after tables were altered.
    pub fn persist_reload_database_by_alter(
        &self,
        database: &str,
        reload: &Database,
        current: &Database,
    ) -> Result<ReconciliationPlan> {
        let plan = ReconciliationPlan::by_alter(&SchemaDiff::compute(reload, current));
        tracing::info!(database, operations = plan.len(), "Reconciling schemas by alter");
        self.metadata.apply(database, &plan)?;
        Ok(plan)
    }

    /// Reconcile stored schemas with `reload` after tables or schemas were dropped.
    pub fn persist_reload_database_by_drop(
        &self,
        database: &str,
        reload: &Database,
        current: &Database,
    ) -> Result<ReconciliationPlan> {
        let plan = ReconciliationPlan::by_drop(&SchemaDiff::compute(reload, current));
        tracing::info!(database, operations = plan.len(), "Reconciling schemas by drop");
        self.metadata.apply(database, &plan)?;
        Ok(plan)
    }
}
