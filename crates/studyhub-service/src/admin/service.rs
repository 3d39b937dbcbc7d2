use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use studyhub_core::error::AppError;
use studyhub_core::types::{FolderId, UserId};
use studyhub_database::repositories::{
    ContactRepository, FileRepository, FolderRepository, PendingDeletionRepository,
    UserDataRepository, UserRepository,
};
use studyhub_entity::folder::{Folder, FolderSummary};
use studyhub_entity::user::{UserProfile, UserRole};

use crate::context::RequestContext;
use crate::materials::{DeleteFolderOutcome, FolderService, UpdateFolderRequest};

/// Repositories the admin service reads from.
#[derive(Debug, Clone)]
pub struct AdminRepositories {
    pub users: Arc<UserRepository>,
    pub planner: Arc<UserDataRepository>,
    pub folders: Arc<FolderRepository>,
    pub files: Arc<FileRepository>,
    pub contact: Arc<ContactRepository>,
    pub pending_deletions: Arc<PendingDeletionRepository>,
}

/// Manages users, folders, and site statistics.
#[derive(Debug, Clone)]
pub struct AdminService {
    repos: AdminRepositories,
    folder_service: Arc<FolderService>,
    max_upload_size_bytes: u64,
}

/// Request to update a user's profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub role: Option<UserRole>,
}

/// Site-wide counters for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub admin_users: i64,
    pub folder_count: i64,
    pub file_count: i64,
    pub total_file_bytes: i64,
    pub pending_contact_requests: i64,
    pub pending_blob_deletions: i64,
    pub max_upload_size_bytes: u64,
}

impl AdminService {
    /// Creates a new admin service.
    pub fn new(
        repos: AdminRepositories,
        folder_service: Arc<FolderService>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            repos,
            folder_service,
            max_upload_size_bytes,
        }
    }

    /// Lists users whose email or username contains `search`.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
    ) -> Result<Vec<UserProfile>, AppError> {
        ctx.require_admin()?;
        self.repos.users.list(search).await
    }

    /// Changes a user's username and/or role.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        user_id: &UserId,
        req: UpdateUserRequest,
    ) -> Result<UserProfile, AppError> {
        ctx.require_admin()?;
        if *user_id == ctx.user_id && req.role.is_some_and(|r| !r.is_admin()) {
            return Err(AppError::authorization("Cannot change your own role"));
        }
        let username = req
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());
        let profile = self.repos.users.update(user_id, username, req.role).await?;

        info!(admin_id = %ctx.user_id, user_id = %user_id, role = %profile.role, "User updated");
        Ok(profile)
    }

    /// Deletes a user's profile and planner document.
    ///
    /// The id is remembered so the user's tokens cannot re-create the
    /// profile. Folders and files the user created stay in the shared tree.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &UserId) -> Result<bool, AppError> {
        ctx.require_admin()?;
        if *user_id == ctx.user_id {
            return Err(AppError::authorization("Cannot delete your own account"));
        }

        let mut tx = self.repos.planner.begin().await?;
        let planner_removed = self.repos.planner.delete(&mut tx, user_id).await?;
        let profile_removed = self.repos.users.delete(&mut tx, user_id).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit user delete: {e}")))?;

        info!(
            admin_id = %ctx.user_id,
            user_id = %user_id,
            profile_removed,
            planner_removed,
            "User deleted"
        );
        Ok(profile_removed || planner_removed)
    }

    /// Flat folder listing with paths and file counts, optionally filtered.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        search: Option<&str>,
    ) -> Result<Vec<FolderSummary>, AppError> {
        ctx.require_admin()?;
        match search.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => self.folder_service.search(ctx, query).await,
            None => self.folder_service.summaries().await,
        }
    }

    /// Renames and/or retags any folder.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        req: UpdateFolderRequest,
    ) -> Result<Folder, AppError> {
        ctx.require_admin()?;
        self.folder_service.update_folder(ctx, folder_id, req).await
    }

    /// Deletes any folder with the same cascade as the materials page.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> Result<DeleteFolderOutcome, AppError> {
        ctx.require_admin()?;
        self.folder_service.delete_folder(ctx, folder_id).await
    }

    /// Site-wide counters.
    pub async fn stats(&self, ctx: &RequestContext) -> Result<AdminStats, AppError> {
        ctx.require_admin()?;
        let (total_users, admin_users) = self.repos.users.counts().await?;
        let folder_count = self.repos.folders.count().await?;
        let (file_count, total_file_bytes) = self.repos.files.totals().await?;
        let pending_contact_requests = self.repos.contact.count_pending().await?;
        let pending_blob_deletions = self.repos.pending_deletions.count().await?;

        Ok(AdminStats {
            total_users,
            admin_users,
            folder_count,
            file_count,
            total_file_bytes,
            pending_contact_requests,
            pending_blob_deletions,
            max_upload_size_bytes: self.max_upload_size_bytes,
        })
    }
}
