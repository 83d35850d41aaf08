//! Copies of the live sqlite file: on-demand backups and restore from upload.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::UserId;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Database file not found at {0}")]
    SourceMissing(String),

    #[error("Backups are only supported for file-backed sqlite databases")]
    Unsupported,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<anyhow::Error> for BackupError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Leading bytes of every sqlite 3 database file.
pub const SQLITE_HEADER: &[u8] = b"SQLite format 3\0";

#[async_trait::async_trait]
pub trait BackupService: Send + Sync {
    /// Copies the live database into the configured backup directory and
    /// returns the path of the new file.
    async fn create_backup(&self, actor: UserId) -> Result<PathBuf, BackupError>;

    /// Replaces the live database with `contents`, keeping a safety copy of
    /// the previous file next to it.
    async fn restore_backup(&self, contents: Vec<u8>, actor: UserId) -> Result<(), BackupError>;
}
