//! Caller profile handler.

use axum::Json;
use axum::extract::State;

use studyhub_entity::user::UserProfile;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/me
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.user_service.get_profile(&auth.user_id).await?;
    Ok(Json(ApiResponse::ok(profile)))
}
