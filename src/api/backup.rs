use axum::{
    Extension, Json,
    extract::{Multipart, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, BackupResponse, CurrentUser, MessageResponse};
use crate::services::BackupError;

const UPLOAD_FIELD: &str = "file";

impl From<BackupError> for ApiError {
    fn from(err: BackupError) -> Self {
        match err {
            BackupError::SourceMissing(_) => Self::NotFound(err.to_string()),
            BackupError::Unsupported => Self::validation(err.to_string()),
            BackupError::Validation(msg) => Self::validation(msg),
            BackupError::Io(msg) | BackupError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `POST /api/backups`
pub async fn create_backup(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<BackupResponse>>, ApiError> {
    let path = state.backup_service().create_backup(user.id()).await?;
    Ok(Json(ApiResponse::success(BackupResponse {
        path: path.display().to_string(),
    })))
}

/// `POST /api/restore` with the database in the multipart field `file`.
pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let mut contents = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid upload: {e}")))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;
            contents = Some(bytes.to_vec());
            break;
        }
    }

    let contents =
        contents.ok_or_else(|| ApiError::validation("Missing multipart field 'file'"))?;

    state
        .backup_service()
        .restore_backup(contents, user.id())
        .await?;

    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Database restored. Restart the service to reload connections",
    ))))
}
