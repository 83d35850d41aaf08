//! Filesystem implementation of the `BackupService` trait.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::sqlite_file_path;
use crate::domain::UserId;
use crate::domain::clock::Clock;
use crate::services::audit::{AuditSink, actions};
use crate::services::backup_service::{BackupError, BackupService, SQLITE_HEADER};
use crate::services::config_cache::ConfigCache;

pub struct FileBackupService {
    database_url: String,
    config: Arc<ConfigCache>,
    audit: AuditSink,
    clock: Arc<dyn Clock>,
}

impl FileBackupService {
    #[must_use]
    pub fn new(
        database_url: impl Into<String>,
        config: Arc<ConfigCache>,
        audit: AuditSink,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            database_url: database_url.into(),
            config,
            audit,
            clock,
        }
    }

    fn live_path(&self) -> Result<PathBuf, BackupError> {
        sqlite_file_path(&self.database_url).ok_or(BackupError::Unsupported)
    }

    /// Current time formatted in the office timezone.
    async fn local_stamp(&self, format: &str) -> String {
        let tz = self.config.location_or_utc().await;
        self.clock.now().with_timezone(&tz).format(format).to_string()
    }
}

/// `<live>.before-restore-<stamp>` next to the live file.
fn safety_copy_path(live: &Path, stamp: &str) -> PathBuf {
    let mut name = live.as_os_str().to_owned();
    name.push(format!(".before-restore-{stamp}"));
    PathBuf::from(name)
}

#[async_trait]
impl BackupService for FileBackupService {
    async fn create_backup(&self, actor: UserId) -> Result<PathBuf, BackupError> {
        let source = self.live_path()?;
        if !tokio::fs::try_exists(&source).await? {
            return Err(BackupError::SourceMissing(source.display().to_string()));
        }

        let settings = self.config.get().await?;
        let dir = PathBuf::from(settings.backup_dir());
        tokio::fs::create_dir_all(&dir).await?;

        let stamp = self.local_stamp("%Y-%m-%d_%H-%M-%S").await;
        let destination = dir.join(format!("backup-lostdocs-{stamp}.db"));

        let bytes = tokio::fs::copy(&source, &destination).await?;

        info!(path = %destination.display(), bytes, "Backup created");
        self.audit.log(
            actor,
            actions::BACKUP_CREATED,
            format!("Created backup file {}", destination.display()),
        );

        Ok(destination)
    }

    async fn restore_backup(&self, contents: Vec<u8>, actor: UserId) -> Result<(), BackupError> {
        if !contents.starts_with(SQLITE_HEADER) {
            return Err(BackupError::Validation(
                "The uploaded file is not a sqlite database".to_string(),
            ));
        }

        let live = self.live_path()?;

        if tokio::fs::try_exists(&live).await? {
            let stamp = self.local_stamp("%Y%m%d%H%M%S").await;
            let safety = safety_copy_path(&live, &stamp);
            tokio::fs::copy(&live, &safety).await?;
            info!(path = %safety.display(), "Saved current database before restore");
        } else {
            warn!(path = %live.display(), "No live database to preserve before restore");
        }

        tokio::fs::write(&live, &contents).await?;
        self.config.invalidate().await;

        info!(path = %live.display(), bytes = contents.len(), "Database restored from upload");
        self.audit.log(
            actor,
            actions::RESTORE_FROM_FILE,
            "Database restored from an uploaded backup file",
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_copy_sits_next_to_live_file() {
        let path = safety_copy_path(Path::new("data/lostdocs.db"), "20260301120000");
        assert_eq!(
            path,
            PathBuf::from("data/lostdocs.db.before-restore-20260301120000")
        );
    }
}
