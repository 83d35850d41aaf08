//! First-run setup. Both endpoints are public; the setup itself is refused
//! once it has completed.

use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, MessageResponse, SetupStatusResponse};
use crate::services::SetupRequest;

/// `GET /api/setup/status`
pub async fn get_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<SetupStatusResponse>>, ApiError> {
    let is_setup_complete = state.settings_service().is_setup_complete().await?;
    Ok(Json(ApiResponse::success(SetupStatusResponse {
        is_setup_complete,
    })))
}

/// `POST /api/setup`
pub async fn complete_setup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetupRequest>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.settings_service().complete_setup(request).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Setup completed. Log in with the new super admin account",
    ))))
}
