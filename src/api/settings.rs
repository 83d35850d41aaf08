use axum::{Extension, Json, extract::State};
use std::collections::HashMap;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, CurrentUser};
use crate::services::{AppSettings, SettingsError};

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::AlreadyConfigured => Self::forbidden(err.to_string()),
            SettingsError::Validation(msg) => Self::validation(msg),
            SettingsError::Database(msg) => Self::DatabaseError(msg),
            SettingsError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/settings`
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<AppSettings>>, ApiError> {
    let settings = state.settings_service().get_settings().await?;
    Ok(Json(ApiResponse::success((*settings).clone())))
}

/// `PUT /api/settings` with a flat `{ key: value }` object.
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(values): Json<HashMap<String, String>>,
) -> Result<Json<ApiResponse<AppSettings>>, ApiError> {
    let settings = state
        .settings_service()
        .update_settings(values, user.id())
        .await?;
    Ok(Json(ApiResponse::success((*settings).clone())))
}
