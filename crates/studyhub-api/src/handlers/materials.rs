//! Folder tree and file handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;

use studyhub_core::error::AppError;
use studyhub_core::types::{FileId, FolderId};
use studyhub_entity::file::StoredFile;
use studyhub_entity::folder::{Folder, FolderNode, FolderSummary};
use studyhub_service::{
    CreateFolderRequest, DeleteFolderOutcome, MoveFileRequest, UpdateFolderRequest,
    UploadFileParams,
};

use crate::dto::request::{
    CreateFolderBody, MoveFileBody, SearchQuery, UpdateFolderBody, validate_body,
};
use crate::dto::response::{ApiResponse, DeletedResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/materials/tree
pub async fn get_tree(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FolderNode>>>, ApiError> {
    let tree = state.folder_service.get_tree(&auth).await?;
    Ok(Json(ApiResponse::ok(tree)))
}

/// GET /api/materials/search?q=
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<FolderSummary>>>, ApiError> {
    let hits = state
        .folder_service
        .search(&auth, query.q.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::ok(hits)))
}

/// POST /api/materials/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateFolderBody>,
) -> Result<(StatusCode, Json<ApiResponse<FolderNode>>), ApiError> {
    validate_body(&body)?;
    let folder = state
        .folder_service
        .create_folder(
            &auth,
            CreateFolderRequest {
                name: body.name,
                tags: body.tags,
                parent_id: body.parent_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// GET /api/materials/folders/{id}
pub async fn get_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<FolderNode>>, ApiError> {
    let folder = state.folder_service.get_folder(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// PUT /api/materials/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
    Json(body): Json<UpdateFolderBody>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    validate_body(&body)?;
    let folder = state
        .folder_service
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

/// DELETE /api/materials/folders/{id}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<DeleteFolderOutcome>>, ApiError> {
    let outcome = state.folder_service.delete_folder(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// GET /api/materials/folders/{id}/breadcrumbs
pub async fn breadcrumbs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let crumbs = state.folder_service.breadcrumbs(&auth, &id).await?;
    Ok(Json(ApiResponse::ok(crumbs)))
}

/// POST /api/materials/folders/{id}/files (multipart, field `file`)
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(folder_id): Path<FolderId>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<StoredFile>>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::validation("Multipart field 'file' has no file name"))?;
        let mime_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Failed to read upload: {e}")))?;

        let file = state
            .file_service
            .upload_file(
                &auth,
                UploadFileParams {
                    folder_id,
                    file_name,
                    mime_type,
                    data,
                },
            )
            .await?;
        return Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))));
    }

    Err(AppError::validation("Multipart field 'file' is required").into())
}

/// GET /api/materials/folders/{id}/files/{file_id}
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((folder_id, file_id)): Path<(FolderId, FileId)>,
) -> Result<Response, ApiError> {
    let download = state
        .file_service
        .download_file(&auth, &folder_id, &file_id)
        .await?;
    let file = download.file;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.name.replace('"', "")),
        )
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// DELETE /api/materials/folders/{id}/files/{file_id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((folder_id, file_id)): Path<(FolderId, FileId)>,
) -> Result<Json<ApiResponse<DeletedResponse>>, ApiError> {
    let deleted = state
        .file_service
        .delete_file(&auth, &folder_id, &file_id)
        .await?;
    Ok(Json(ApiResponse::ok(DeletedResponse { deleted })))
}

/// POST /api/materials/files/{file_id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(file_id): Path<FileId>,
    Json(body): Json<MoveFileBody>,
) -> Result<Json<ApiResponse<StoredFile>>, ApiError> {
    let file = state
        .file_service
        .move_file(
            &auth,
            &file_id,
            MoveFileRequest {
                source_folder_id: body.source_folder_id,
                destination_folder_id: body.destination_folder_id,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(file)))
}
