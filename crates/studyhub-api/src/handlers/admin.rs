//! Admin panel handlers. Role checks happen in the services.

use axum::Json;
use axum::extract::{Path, Query, State};

use studyhub_core::types::{ContactRequestId, FolderId, UserId};
use studyhub_entity::contact::ContactRequest;
use studyhub_entity::folder::{Folder, FolderSummary};
use studyhub_entity::user::UserProfile;
use studyhub_service::{AdminStats, DeleteFolderOutcome, UpdateFolderRequest, UpdateUserRequest};

use crate::dto::request::{
    ContactListQuery, ContactStatusBody, SearchQuery, UpdateFolderBody, validate_body,
};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/admin/users?q=
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<UserProfile>>>, ApiError> {
    let users = state
        .admin_service
        .list_users(&auth, query.q.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// PUT /api/admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let user = state.admin_service.update_user(&auth, &id, body).await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<UserId>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let deleted = state.admin_service.delete_user(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted })))
}

/// GET /api/admin/folders?q=
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<FolderSummary>>>, ApiError> {
    let folders = state
        .admin_service
        .list_folders(&auth, query.q.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// PUT /api/admin/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
    Json(body): Json<UpdateFolderBody>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    validate_body(&body)?;
    let folder = state
        .admin_service
        .update_folder(
            &auth,
            &id,
            UpdateFolderRequest {
                name: body.name,
                tags: body.tags,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/admin/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<DeleteFolderOutcome>>, ApiError> {
    let outcome = state.admin_service.delete_folder(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/admin/stats
pub async fn stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AdminStats>>, ApiError> {
    let stats = state.admin_service.stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// GET /api/admin/contact?status=
pub async fn list_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ContactListQuery>,
) -> Result<Json<ApiResponse<Vec<ContactRequest>>>, ApiError> {
    let requests = state.contact_service.list(&auth, query.status).await?;
    Ok(Json(ApiResponse::ok(requests)))
}

/// PUT /api/admin/contact/{id}
pub async fn set_contact_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ContactRequestId>,
    Json(body): Json<ContactStatusBody>,
) -> Result<Json<ApiResponse<ContactRequest>>, ApiError> {
    let request = state
        .contact_service
        .set_status(&auth, &id, body.status)
        .await?;
    Ok(Json(ApiResponse::ok(request)))
}
