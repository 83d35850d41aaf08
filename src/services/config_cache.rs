//! In-memory view of the `configurations` table.
//!
//! Readers get a shared snapshot of [`AppSettings`]; writers persist and then
//! drop the snapshot so the next read reloads it. The resolved timezone lives
//! in the same snapshot because it is needed on every dashboard and numbering
//! call.

use chrono_tz::Tz;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::db::Store;

pub mod keys {
    pub const IS_SETUP_COMPLETE: &str = "is_setup_complete";
    pub const HEADER_LINE_1: &str = "header_line_1";
    pub const HEADER_LINE_2: &str = "header_line_2";
    pub const HEADER_LINE_3: &str = "header_line_3";
    pub const OFFICE_NAME: &str = "office_name";
    pub const LETTER_PLACE: &str = "letter_place";
    pub const NUMBER_FORMAT: &str = "number_format";
    pub const LAST_NUMBER: &str = "last_number";
    pub const TIMEZONE: &str = "timezone";
    pub const BACKUP_PATH: &str = "backup_path";
    pub const ARCHIVE_DURATION_DAYS: &str = "archive_duration_days";

    pub const ALL: [&str; 11] = [
        IS_SETUP_COMPLETE,
        HEADER_LINE_1,
        HEADER_LINE_2,
        HEADER_LINE_3,
        OFFICE_NAME,
        LETTER_PLACE,
        NUMBER_FORMAT,
        LAST_NUMBER,
        TIMEZONE,
        BACKUP_PATH,
        ARCHIVE_DURATION_DAYS,
    ];
}

pub const DEFAULT_BACKUP_PATH: &str = "./backups";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct AppSettings {
    pub is_setup_complete: bool,
    pub header_line_1: String,
    pub header_line_2: String,
    pub header_line_3: String,
    pub office_name: String,
    pub letter_place: String,
    pub number_format: String,
    /// Fallback running number; non-numeric values read as 0.
    pub last_number: u32,
    pub timezone: String,
    pub backup_path: String,
    /// Non-numeric values read as 0.
    pub archive_duration_days: i64,
}

impl AppSettings {
    #[must_use]
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        let text = |key: &str| values.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        Self {
            is_setup_complete: text(keys::IS_SETUP_COMPLETE) == "true",
            header_line_1: text(keys::HEADER_LINE_1),
            header_line_2: text(keys::HEADER_LINE_2),
            header_line_3: text(keys::HEADER_LINE_3),
            office_name: text(keys::OFFICE_NAME),
            letter_place: text(keys::LETTER_PLACE),
            number_format: text(keys::NUMBER_FORMAT),
            last_number: text(keys::LAST_NUMBER).parse().unwrap_or(0),
            timezone: text(keys::TIMEZONE),
            backup_path: text(keys::BACKUP_PATH),
            archive_duration_days: text(keys::ARCHIVE_DURATION_DAYS).parse().unwrap_or(0),
        }
    }

    #[must_use]
    pub fn backup_dir(&self) -> &str {
        if self.backup_path.is_empty() {
            DEFAULT_BACKUP_PATH
        } else {
            &self.backup_path
        }
    }
}

/// Resolves an IANA zone name; an empty name means UTC.
pub fn parse_timezone(name: &str) -> anyhow::Result<Tz> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(Tz::UTC);
    }

    name.parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("Unknown timezone '{name}': {e}"))
}

/// Settings together with the timezone resolved from them. Both are
/// replaced under the same lock so they can never disagree.
#[derive(Clone)]
struct Snapshot {
    settings: Arc<AppSettings>,
    location: Option<Tz>,
}

pub struct ConfigCache {
    store: Store,
    snapshot: RwLock<Option<Snapshot>>,
}

impl ConfigCache {
    #[must_use]
    pub fn new(store: Store) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
        }
    }

    async fn snapshot(&self) -> anyhow::Result<Snapshot> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(snapshot.clone());
        }

        let mut guard = self.snapshot.write().await;
        if let Some(snapshot) = guard.as_ref() {
            return Ok(snapshot.clone());
        }

        let values = self.store.config_repo().get_all().await?;
        let settings = Arc::new(AppSettings::from_map(&values));
        let snapshot = Snapshot {
            location: parse_timezone(&settings.timezone).ok(),
            settings,
        };
        debug!("Configuration snapshot loaded");
        *guard = Some(snapshot.clone());

        Ok(snapshot)
    }

    pub async fn get(&self) -> anyhow::Result<Arc<AppSettings>> {
        Ok(self.snapshot().await?.settings)
    }

    /// Persists all pairs atomically, then drops the snapshot.
    pub async fn save(&self, values: &HashMap<String, String>) -> anyhow::Result<()> {
        self.store.config_repo().set_many(values).await?;
        self.invalidate().await;
        Ok(())
    }

    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }

    pub async fn is_setup_complete(&self) -> anyhow::Result<bool> {
        Ok(self.get().await?.is_setup_complete)
    }

    /// Configured timezone, taken from the same snapshot as [`Self::get`].
    pub async fn location(&self) -> anyhow::Result<Tz> {
        let snapshot = self.snapshot().await?;
        match snapshot.location {
            Some(tz) => Ok(tz),
            None => parse_timezone(&snapshot.settings.timezone),
        }
    }

    /// Like [`Self::location`] but falls back to UTC with a warning.
    pub async fn location_or_utc(&self) -> Tz {
        match self.location().await {
            Ok(tz) => tz,
            Err(e) => {
                warn!(error = %e, "Falling back to UTC");
                Tz::UTC
            }
        }
    }
}
