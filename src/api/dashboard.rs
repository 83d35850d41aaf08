use axum::{
    Extension, Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::validate_window_days;
use super::{ApiError, ApiResponse, AppState, CurrentUser, ExpiringQuery};
use crate::services::{
    ChartData, DashboardError, DashboardStats, ExpiringDocument, PieChartData,
};

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(msg) => Self::DatabaseError(msg),
            DashboardError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/stats`
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardStats>>, ApiError> {
    let stats = state.dashboard_service().stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// `GET /api/stats/monthly-issuance`
pub async fn get_monthly_issuance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ChartData>>, ApiError> {
    let chart = state.dashboard_service().monthly_issuance().await?;
    Ok(Json(ApiResponse::success(chart)))
}

/// `GET /api/stats/item-composition`
pub async fn get_item_composition(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PieChartData>>, ApiError> {
    let chart = state.dashboard_service().item_composition().await?;
    Ok(Json(ApiResponse::success(chart)))
}

/// `GET /api/notifications/expiring-documents?window_days=`
///
/// Letters of the current user that become archived within the window.
pub async fn get_expiring_documents(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ExpiringQuery>,
) -> Result<Json<ApiResponse<Vec<ExpiringDocument>>>, ApiError> {
    let window_days = validate_window_days(query.window_days)?;
    let documents = state
        .dashboard_service()
        .expiring_documents(user.id(), window_days)
        .await?;
    Ok(Json(ApiResponse::success(documents)))
}
