//! `SeaORM` implementation of the `SettingsService` trait.

use async_trait::async_trait;
use sea_orm::TransactionTrait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::config::SecurityConfig;
use crate::db::repositories::config::ConfigRepository;
use crate::db::repositories::user::UserRepository;
use crate::db::{NewUser, Store};
use crate::domain::UserId;
use crate::domain::clock::{Clock, format_timestamp};
use crate::entities::users::Role;
use crate::services::audit::{AuditSink, actions};
use crate::services::config_cache::{AppSettings, ConfigCache};
use crate::services::settings_service::{
    SettingsError, SettingsService, SetupRequest, validate_settings,
};

pub struct SeaOrmSettingsService {
    store: Store,
    config: Arc<ConfigCache>,
    audit: AuditSink,
    clock: Arc<dyn Clock>,
    security: SecurityConfig,
}

impl SeaOrmSettingsService {
    #[must_use]
    pub fn new(
        store: Store,
        config: Arc<ConfigCache>,
        audit: AuditSink,
        clock: Arc<dyn Clock>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            store,
            config,
            audit,
            clock,
            security,
        }
    }
}

#[async_trait]
impl SettingsService for SeaOrmSettingsService {
    async fn get_settings(&self) -> Result<Arc<AppSettings>, SettingsError> {
        Ok(self.config.get().await?)
    }

    async fn update_settings(
        &self,
        values: HashMap<String, String>,
        actor: UserId,
    ) -> Result<Arc<AppSettings>, SettingsError> {
        if values.is_empty() {
            return Err(SettingsError::Validation("No settings given".to_string()));
        }
        validate_settings(&values).map_err(SettingsError::Validation)?;

        let values: HashMap<String, String> = values
            .into_iter()
            .map(|(k, v)| (k, v.trim().to_string()))
            .collect();

        self.config.save(&values).await?;

        let mut changed: Vec<&str> = values.keys().map(String::as_str).collect();
        changed.sort_unstable();
        info!(actor = %actor, keys = ?changed, "Settings updated");
        self.audit.log(
            actor,
            actions::SETTINGS_UPDATED,
            format!("Updated settings: {}", changed.join(", ")),
        );

        Ok(self.config.get().await?)
    }

    async fn is_setup_complete(&self) -> Result<bool, SettingsError> {
        Ok(self.config.is_setup_complete().await?)
    }

    async fn complete_setup(&self, request: SetupRequest) -> Result<(), SettingsError> {
        if self.config.is_setup_complete().await? {
            return Err(SettingsError::AlreadyConfigured);
        }
        request.validate().map_err(SettingsError::Validation)?;

        let nrp = request.admin_nrp.trim().to_string();
        if self.store.get_user_by_nrp(&nrp).await?.is_some() {
            return Err(SettingsError::Validation(format!(
                "NRP {nrp} is already registered"
            )));
        }

        let now = format_timestamp(self.clock.now());
        let settings = request.settings();

        let txn = self.store.conn.begin().await?;
        let admin = UserRepository::create(
            &txn,
            NewUser {
                full_name: request.admin_full_name.trim().to_string(),
                nrp,
                rank: request.admin_rank.trim().to_string(),
                position: Role::SuperAdmin.as_str().to_string(),
                role: Role::SuperAdmin,
                password: request.admin_password,
            },
            &self.security,
            &now,
        )
        .await?;
        ConfigRepository::upsert_all(&txn, &settings).await?;
        txn.commit().await?;

        self.config.invalidate().await;

        info!(admin_id = admin.id, "Initial setup completed");
        self.audit.log(
            UserId::SYSTEM,
            actions::CREATE_USER,
            format!("Created super admin {} ({}) during setup", admin.full_name, admin.nrp),
        );

        Ok(())
    }
}
