//! Contact form handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use studyhub_entity::contact::ContactRequest;
use studyhub_service::SubmitContactRequest;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<SubmitContactRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactRequest>>), ApiError> {
    let request = state.contact_service.submit(&auth, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}
