use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::domain::clock::{Clock, SystemClock};
use crate::services::{
    AuditSink, AuthService, BackupService, ConfigCache, DashboardService, DocumentService,
    FileBackupService, SeaOrmAuthService, SeaOrmDashboardService, SeaOrmDocumentService,
    SeaOrmSettingsService, SeaOrmUserService, SettingsService, UserService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub clock: Arc<dyn Clock>,

    pub config_cache: Arc<ConfigCache>,

    pub audit: AuditSink,

    pub document_service: Arc<dyn DocumentService>,

    pub dashboard_service: Arc<dyn DashboardService>,

    pub settings_service: Arc<dyn SettingsService>,

    pub backup_service: Arc<dyn BackupService>,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Builds the state with an explicit clock, so tests can move time.
    pub async fn with_clock(config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let config_cache = Arc::new(ConfigCache::new(store.clone()));
        let audit = AuditSink::spawn(
            store.clone(),
            Arc::clone(&clock),
            config.audit.queue_capacity,
        );

        let document_service = Arc::new(SeaOrmDocumentService::new(
            store.clone(),
            Arc::clone(&config_cache),
            audit.clone(),
            Arc::clone(&clock),
        )) as Arc<dyn DocumentService>;

        let dashboard_service = Arc::new(SeaOrmDashboardService::new(
            store.clone(),
            Arc::clone(&config_cache),
            Arc::clone(&clock),
        )) as Arc<dyn DashboardService>;

        let settings_service = Arc::new(SeaOrmSettingsService::new(
            store.clone(),
            Arc::clone(&config_cache),
            audit.clone(),
            Arc::clone(&clock),
            config.security.clone(),
        )) as Arc<dyn SettingsService>;

        let backup_service = Arc::new(FileBackupService::new(
            config.general.database_url.clone(),
            Arc::clone(&config_cache),
            audit.clone(),
            Arc::clone(&clock),
        )) as Arc<dyn BackupService>;

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            audit.clone(),
            Arc::clone(&clock),
            config.security.clone(),
        )) as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(
            store.clone(),
            audit.clone(),
            Arc::clone(&clock),
            config.security.clone(),
        )) as Arc<dyn UserService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            clock,
            config_cache,
            audit,
            document_service,
            dashboard_service,
            settings_service,
            backup_service,
            auth_service,
            user_service,
        })
    }
}
