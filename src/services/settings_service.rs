//! Office settings and the one-time initial setup.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::UserId;
use crate::domain::status::MAX_ARCHIVE_DAYS;
use crate::services::config_cache::{AppSettings, keys, parse_timezone};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("The application has already been configured")]
    AlreadyConfigured,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for SettingsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SettingsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Body of the initial setup: office settings plus the first super-admin.
#[derive(Debug, Clone, Deserialize)]
pub struct SetupRequest {
    #[serde(default)]
    pub header_line_1: String,
    #[serde(default)]
    pub header_line_2: String,
    #[serde(default)]
    pub header_line_3: String,
    pub office_name: String,
    #[serde(default)]
    pub letter_place: String,
    pub number_format: String,
    #[serde(default)]
    pub last_number: String,
    pub timezone: String,
    pub archive_duration_days: String,
    pub admin_full_name: String,
    pub admin_nrp: String,
    #[serde(default)]
    pub admin_rank: String,
    pub admin_password: String,
}

impl SetupRequest {
    /// Settings pairs written by the setup, `is_setup_complete` included.
    #[must_use]
    pub fn settings(&self) -> HashMap<String, String> {
        let last_number = if self.last_number.trim().is_empty() {
            "0"
        } else {
            self.last_number.trim()
        };

        [
            (keys::HEADER_LINE_1, self.header_line_1.trim()),
            (keys::HEADER_LINE_2, self.header_line_2.trim()),
            (keys::HEADER_LINE_3, self.header_line_3.trim()),
            (keys::OFFICE_NAME, self.office_name.trim()),
            (keys::LETTER_PLACE, self.letter_place.trim()),
            (keys::NUMBER_FORMAT, self.number_format.trim()),
            (keys::LAST_NUMBER, last_number),
            (keys::TIMEZONE, self.timezone.trim()),
            (keys::ARCHIVE_DURATION_DAYS, self.archive_duration_days.trim()),
            (keys::IS_SETUP_COMPLETE, "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.office_name.trim().is_empty() {
            return Err("Office name is required".to_string());
        }
        if self.admin_full_name.trim().is_empty() || self.admin_nrp.trim().is_empty() {
            return Err("Administrator name and NRP are required".to_string());
        }
        if self.admin_password.len() < 8 {
            return Err("Administrator password must be at least 8 characters".to_string());
        }
        let mut settings = self.settings();
        settings.remove(keys::IS_SETUP_COMPLETE);
        validate_settings(&settings)
    }
}

/// Checks a partial settings update. Only known keys are accepted and the
/// setup flag cannot be changed through it.
pub fn validate_settings(values: &HashMap<String, String>) -> Result<(), String> {
    for (key, value) in values {
        let value = value.trim();
        match key.as_str() {
            keys::IS_SETUP_COMPLETE => {
                return Err("is_setup_complete cannot be changed".to_string());
            }
            keys::BACKUP_PATH if value.contains("..") => {
                return Err("Backup path must not contain '..'".to_string());
            }
            keys::TIMEZONE => {
                parse_timezone(value).map_err(|e| e.to_string())?;
            }
            keys::ARCHIVE_DURATION_DAYS => match value.parse::<i64>() {
                Ok(days) if (0..=MAX_ARCHIVE_DAYS).contains(&days) => {}
                _ => {
                    return Err(format!(
                        "archive_duration_days must be a number between 0 and {MAX_ARCHIVE_DAYS}, got '{value}'"
                    ));
                }
            },
            keys::LAST_NUMBER if value.parse::<u32>().is_err() => {
                return Err(format!("last_number must be a non-negative number, got '{value}'"));
            }
            keys::NUMBER_FORMAT if value.is_empty() => {
                return Err("number_format must not be empty".to_string());
            }
            k if !keys::ALL.contains(&k) => {
                return Err(format!("Unknown setting '{k}'"));
            }
            _ => {}
        }
    }
    Ok(())
}

#[async_trait::async_trait]
pub trait SettingsService: Send + Sync {
    async fn get_settings(&self) -> Result<Arc<AppSettings>, SettingsError>;

    /// Persists the given keys and audits the change.
    async fn update_settings(
        &self,
        values: HashMap<String, String>,
        actor: UserId,
    ) -> Result<Arc<AppSettings>, SettingsError>;

    async fn is_setup_complete(&self) -> Result<bool, SettingsError>;

    /// Writes the initial settings and creates the first super-admin in one
    /// transaction. Fails once setup has completed.
    async fn complete_setup(&self, request: SetupRequest) -> Result<(), SettingsError>;
}
