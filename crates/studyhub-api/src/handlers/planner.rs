//! Planner handlers.

use axum::Json;
use axum::extract::{Path, State};
use chrono::Utc;

use studyhub_core::error::AppError;
use studyhub_entity::planner::{Dashboard, PlannerSection, UserData};
use studyhub_service::AddEntryRequest;

use crate::dto::request::ProgressBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/planner
pub async fn get_user_data(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let data = state.planner_service.get_user_data(&auth).await?;
    Ok(Json(ApiResponse::ok(data)))
}

/// GET /api/planner/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let today = Utc::now().date_naive();
    let dashboard = state.planner_service.dashboard(&auth, today).await?;
    Ok(Json(ApiResponse::ok(dashboard)))
}

/// POST /api/planner/{section}
pub async fn add_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(section): Path<String>,
    Json(body): Json<AddEntryRequest>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let section: PlannerSection = section.parse()?;
    let data = state.planner_service.add_entry(&auth, section, body).await?;
    Ok(Json(ApiResponse::ok(data)))
}

/// DELETE /api/planner/{section}/{index}
pub async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((section, index)): Path<(String, usize)>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let section: PlannerSection = section.parse()?;
    let data = state
        .planner_service
        .delete_entry(&auth, section, index)
        .await?;
    Ok(Json(ApiResponse::ok(data)))
}

/// PUT /api/planner/{section}/{index}/progress
pub async fn set_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((section, index)): Path<(String, usize)>,
    Json(body): Json<ProgressBody>,
) -> Result<Json<ApiResponse<UserData>>, ApiError> {
    let section: PlannerSection = section.parse()?;
    let progress = u8::try_from(body.progress)
        .map_err(|_| AppError::validation("Progress must be between 0 and 100"))?;
    let data = state
        .planner_service
        .set_progress(&auth, section, index, progress)
        .await?;
    Ok(Json(ApiResponse::ok(data)))
}
