use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::document::{DocumentRecord, ReportWindow};
pub use repositories::user::{NewUser, User};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path) = sqlite_file_path(db_url) {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !path.exists() {
                std::fs::File::create(&path)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn resident_repo(&self) -> repositories::resident::ResidentRepository {
        repositories::resident::ResidentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn document_repo(&self) -> repositories::document::DocumentRepository {
        repositories::document::DocumentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn config_repo(&self) -> repositories::config::ConfigRepository {
        repositories::config::ConfigRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn audit_repo(&self) -> repositories::audit::AuditRepository {
        repositories::audit::AuditRepository::new(self.conn.clone())
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_nrp(&self, nrp: &str) -> Result<Option<User>> {
        self.user_repo().get_by_nrp(nrp).await
    }

    pub async fn get_users_by_ids(&self, ids: &[i32]) -> Result<Vec<User>> {
        self.user_repo().get_by_ids(ids).await
    }
}

/// Filesystem path of a sqlite database URL, or `None` for in-memory
/// databases. Accepts `sqlite:path`, `sqlite://path` and a trailing
/// `?mode=...` style query.
#[must_use]
pub fn sqlite_file_path(db_url: &str) -> Option<PathBuf> {
    let rest = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" || path.starts_with("file::memory:") {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_paths() {
        assert_eq!(
            sqlite_file_path("sqlite:data/lostdocs.db"),
            Some(PathBuf::from("data/lostdocs.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite://data/lostdocs.db?mode=rwc"),
            Some(PathBuf::from("data/lostdocs.db"))
        );
        assert_eq!(
            sqlite_file_path("/var/lib/lostdocs.db"),
            Some(PathBuf::from("/var/lib/lostdocs.db"))
        );
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
    }
}
