pub mod audit;
pub use audit::{AuditEntry, AuditError, AuditSink, AuditStats};

pub mod config_cache;
pub use config_cache::{AppSettings, ConfigCache};

pub mod document_service;
pub mod document_service_impl;
pub use document_service::{DocumentError, DocumentService, LostDocumentDetail};
pub use document_service_impl::SeaOrmDocumentService;

pub mod dashboard_service;
pub mod dashboard_service_impl;
pub use dashboard_service::{
    ChartData, DashboardError, DashboardService, DashboardStats, ExpiringDocument, PieChartData,
};
pub use dashboard_service_impl::SeaOrmDashboardService;

pub mod settings_service;
pub mod settings_service_impl;
pub use settings_service::{SettingsError, SettingsService, SetupRequest};
pub use settings_service_impl::SeaOrmSettingsService;

pub mod backup_service;
pub mod backup_service_impl;
pub use backup_service::{BackupError, BackupService};
pub use backup_service_impl::FileBackupService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{CreateUserRequest, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
