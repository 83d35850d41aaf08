//! Lost-item report letter endpoints.
//!
//! Handlers map HTTP to [`DocumentService`](crate::services::DocumentService)
//! calls; ownership checks happen in the service.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::validation::{normalize_query, validate_id};
use super::{
    ApiError, ApiResponse, AppState, CurrentUser, DocumentListQuery, MessageResponse,
    NextNumberResponse, SearchQuery,
};
use crate::domain::{DocumentId, ListFilter};
use crate::models::document::DocumentInput;
use crate::services::{DocumentError, LostDocumentDetail};

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(id) => Self::not_found("Document", id),
            DocumentError::AccessDenied => Self::forbidden(err.to_string()),
            DocumentError::InvalidActor(_) => Self::unauthorized(err.to_string()),
            DocumentError::Validation(msg) => Self::validation(msg),
            DocumentError::Database(msg) => Self::DatabaseError(msg),
            DocumentError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/documents?q=&status=active|archived`
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<ApiResponse<Vec<LostDocumentDetail>>>, ApiError> {
    let filter = query
        .status
        .as_deref()
        .unwrap_or_default()
        .parse::<ListFilter>()
        .map_err(ApiError::validation)?;

    let documents = state
        .document_service()
        .find_all(normalize_query(query.q), filter)
        .await?;

    Ok(Json(ApiResponse::success(documents)))
}

/// `POST /api/documents`
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(input): Json<DocumentInput>,
) -> Result<(StatusCode, Json<ApiResponse<LostDocumentDetail>>), ApiError> {
    let document = state.document_service().create(input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(document))))
}

/// `GET /api/documents/{id}`
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<LostDocumentDetail>>, ApiError> {
    let id = DocumentId::new(validate_id(id, "document")?);
    let document = state.document_service().find_by_id(id, user.id()).await?;
    Ok(Json(ApiResponse::success(document)))
}

/// `PUT /api/documents/{id}`
pub async fn update_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(input): Json<DocumentInput>,
) -> Result<Json<ApiResponse<LostDocumentDetail>>, ApiError> {
    let id = DocumentId::new(validate_id(id, "document")?);
    let document = state
        .document_service()
        .update(id, input, user.id())
        .await?;
    Ok(Json(ApiResponse::success(document)))
}

/// `DELETE /api/documents/{id}`
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    let id = DocumentId::new(validate_id(id, "document")?);
    state.document_service().delete(id, user.id()).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(format!(
        "Document {id} deleted"
    )))))
}

/// `GET /api/search?q=` across active and archived letters.
pub async fn search_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<LostDocumentDetail>>>, ApiError> {
    let documents = state
        .document_service()
        .search_global(query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::success(documents)))
}

/// `GET /api/documents/next-number`
pub async fn next_number(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<NextNumberResponse>>, ApiError> {
    let document_number = state.document_service().preview_next_number().await?;
    Ok(Json(ApiResponse::success(NextNumberResponse {
        document_number,
    })))
}
