use axum::{Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::{AuditEntry, AuditError};

impl From<AuditError> for ApiError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

/// `GET /api/audit-logs`, newest first.
pub async fn list_audit_logs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<AuditEntry>>>, ApiError> {
    let entries = state.shared.audit.find_all().await?;
    Ok(Json(ApiResponse::success(entries)))
}
