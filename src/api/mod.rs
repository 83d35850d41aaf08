use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

mod audit;
pub mod auth;
mod backup;
mod dashboard;
mod documents;
mod error;
mod observability;
mod settings;
mod setup;
mod system;
mod types;
mod users;
mod validation;

pub use auth::CurrentUser;
pub use error::ApiError;
pub use types::*;

use crate::services::{
    AuthService, BackupService, DashboardService, DocumentService, SettingsService, UserService,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<Config> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn document_service(&self) -> &Arc<dyn DocumentService> {
        &self.shared.document_service
    }

    #[must_use]
    pub fn dashboard_service(&self) -> &Arc<dyn DashboardService> {
        &self.shared.dashboard_service
    }

    #[must_use]
    pub fn settings_service(&self) -> &Arc<dyn SettingsService> {
        &self.shared.settings_service
    }

    #[must_use]
    pub fn backup_service(&self) -> &Arc<dyn BackupService> {
        &self.shared.backup_service
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn user_service(&self) -> &Arc<dyn UserService> {
        &self.shared.user_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = state.config().server.clone();

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_idle_minutes,
        )));

    let api_router = Router::new()
        .merge(create_protected_router(state.clone()))
        .merge(create_admin_router(state.clone(), server.max_restore_upload_mb))
        .route("/health", get(system::health))
        .route("/setup/status", get(setup::get_status))
        .route("/setup", post(setup::complete_setup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .layer(session_layer)
        .with_state(state);

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", axum::routing::put(auth::change_password))
        .route(
            "/documents",
            get(documents::list_documents).post(documents::create_document),
        )
        .route("/documents/next-number", get(documents::next_number))
        .route(
            "/documents/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
        .route("/search", get(documents::search_documents))
        .route("/stats", get(dashboard::get_stats))
        .route(
            "/stats/monthly-issuance",
            get(dashboard::get_monthly_issuance),
        )
        .route(
            "/stats/item-composition",
            get(dashboard::get_item_composition),
        )
        .route(
            "/notifications/expiring-documents",
            get(dashboard::get_expiring_documents),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

/// Super-admin routes. `auth_middleware` is the outer layer so the current
/// user is known when `require_admin` runs.
fn create_admin_router(state: Arc<AppState>, max_upload_mb: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/operators", get(users::list_operators))
        .route("/users/{id}", delete(users::deactivate_user))
        .route("/users/{id}/activate", post(users::activate_user))
        .route("/audit-logs", get(audit::list_audit_logs))
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/backups", post(backup::create_backup))
        .route(
            "/restore",
            post(backup::restore_backup)
                .layer(DefaultBodyLimit::max(max_upload_mb.saturating_mul(1024 * 1024))),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn(auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
