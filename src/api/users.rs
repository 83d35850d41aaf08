use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::validate_id;
use super::{ApiError, ApiResponse, AppState, CurrentUser, MessageResponse};
use crate::domain::UserId;
use crate::services::{CreateUserRequest, UserError, UserInfo};

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::not_found("User", id),
            UserError::Conflict(msg) => Self::Conflict(msg),
            UserError::Validation(msg) => Self::validation(msg),
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/users`
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    let users = state.user_service().list_users().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// `GET /api/users/operators`
pub async fn list_operators(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<UserInfo>>>, ApiError> {
    let users = state.user_service().list_operators().await?;
    Ok(Json(ApiResponse::success(users)))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state
        .user_service()
        .create_user(request, actor.id())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// `DELETE /api/users/{id}` deactivates the account.
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = UserId::new(validate_id(id, "user")?);
    state.user_service().deactivate(id, actor.id()).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "User {id} deactivated"
    )))))
}

/// `POST /api/users/{id}/activate`
pub async fn activate_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = UserId::new(validate_id(id, "user")?);
    state.user_service().activate(id, actor.id()).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "User {id} activated"
    )))))
}
