//! Folder CRUD over the materials tree.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use studyhub_core::error::AppError;
use studyhub_core::types::FolderId;
use studyhub_database::repositories::FolderRepository;
use studyhub_entity::folder::{Folder, FolderNode, FolderSummary, validate_folder_name};

use crate::context::RequestContext;
use crate::janitor::BlobJanitor;

/// Manages the materials folder tree.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
    /// Deferred blob deletion.
    janitor: Arc<BlobJanitor>,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Parent folder ID (None for root-level).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Request to rename or retag a folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolderRequest {
    /// New name.
    pub name: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

/// What a folder deletion removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderOutcome {
    /// Whether the folder existed.
    pub deleted: bool,
    /// Folders removed, including the target.
    pub folders_removed: usize,
    /// File records removed.
    pub files_removed: usize,
    /// Blobs queued for a later retry.
    pub blobs_deferred: usize,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>, janitor: Arc<BlobJanitor>) -> Self {
        Self {
            folder_repo,
            janitor,
        }
    }

    /// The whole tree, roots first, children in position order.
    pub async fn get_tree(&self, _ctx: &RequestContext) -> Result<Vec<FolderNode>, AppError> {
        Ok(self.folder_repo.tree().await?.to_nested())
    }

    /// One folder with its descendants.
    pub async fn get_folder(
        &self,
        _ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> Result<FolderNode, AppError> {
        self.folder_repo
            .tree()
            .await?
            .subtree(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))
    }

    /// The chain of folders from the root down to `folder_id`.
    pub async fn breadcrumbs(
        &self,
        _ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> Result<Vec<Folder>, AppError> {
        let tree = self.folder_repo.tree().await?;
        if !tree.contains(folder_id) {
            return Err(AppError::not_found(format!("Folder '{folder_id}' not found")));
        }
        Ok(tree.ancestors(folder_id).into_iter().cloned().collect())
    }

    /// Folders whose name or tags contain `query`, flattened with paths.
    pub async fn search(
        &self,
        _ctx: &RequestContext,
        query: &str,
    ) -> Result<Vec<FolderSummary>, AppError> {
        let tree = self.folder_repo.tree().await?;
        let matching: Vec<FolderId> = tree.search(query).into_iter().map(|f| f.id.clone()).collect();
        Ok(tree
            .summaries()
            .into_iter()
            .filter(|s| matching.contains(&s.id))
            .collect())
    }

    /// Flat listing of every folder.
    pub async fn summaries(&self) -> Result<Vec<FolderSummary>, AppError> {
        Ok(self.folder_repo.tree().await?.summaries())
    }

    /// Creates a new folder at the end of its parent's children.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> Result<FolderNode, AppError> {
        validate_folder_name(&req.name)?;
        let folder = Folder::new(
            req.name,
            req.tags,
            req.parent_id,
            Some(ctx.user_id.clone()),
        );

        let mut tx = self.folder_repo.begin().await?;
        let mut tree = self.folder_repo.load_tree(&mut tx).await?;
        let position = tree.insert_folder(folder.clone())?;
        self.folder_repo.insert(&mut tx, &folder).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit folder: {e}")))?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            position,
            "Folder created"
        );

        tree.subtree(&folder.id)
            .ok_or_else(|| AppError::internal("Created folder missing from tree"))
    }

    /// Renames and/or retags a folder.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        req: UpdateFolderRequest,
    ) -> Result<Folder, AppError> {
        let mut tx = self.folder_repo.begin().await?;
        let mut tree = self.folder_repo.load_tree(&mut tx).await?;
        let folder = tree.update_folder(folder_id, req.name, req.tags)?.clone();
        self.folder_repo.update(&mut tx, &folder).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit folder update: {e}")))?;

        info!(user_id = %ctx.user_id, folder_id = %folder_id, "Folder updated");
        Ok(folder)
    }

    /// Deletes a folder, its descendants, and every file beneath them.
    ///
    /// Deleting a missing folder succeeds with `deleted: false`. Rows are
    /// removed in one transaction before any blob is touched.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
    ) -> Result<DeleteFolderOutcome, AppError> {
        let mut tx = self.folder_repo.begin().await?;
        let mut tree = self.folder_repo.load_tree(&mut tx).await?;
        let Some(removed) = tree.remove_subtree(folder_id) else {
            return Ok(DeleteFolderOutcome::default());
        };
        self.folder_repo
            .delete_many(&mut tx, &removed.folder_ids)
            .await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit folder delete: {e}")))?;

        let mut outcome = DeleteFolderOutcome {
            deleted: true,
            folders_removed: removed.folder_ids.len(),
            files_removed: removed.files.len(),
            blobs_deferred: 0,
        };
        for file in &removed.files {
            if !self.janitor.delete_or_defer(&file.storage_path).await {
                outcome.blobs_deferred += 1;
            }
        }

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            folders = outcome.folders_removed,
            files = outcome.files_removed,
            deferred = outcome.blobs_deferred,
            "Folder deleted"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use studyhub_core::config::JanitorConfig;
    use studyhub_core::error::ErrorKind;
    use studyhub_core::traits::storage::StorageProvider;
    use studyhub_core::types::UserId;
    use studyhub_database::DatabasePool;
    use studyhub_database::repositories::{FileRepository, PendingDeletionRepository};
    use studyhub_entity::user::UserRole;
    use studyhub_storage::providers::MemoryStorageProvider;

    use crate::materials::{FileService, UploadFileParams};

    struct Fixture {
        folders: FolderService,
        files: FileService,
        storage: MemoryStorageProvider,
        pending: Arc<PendingDeletionRepository>,
        ctx: RequestContext,
    }

    async fn fixture() -> Fixture {
        let db = DatabasePool::in_memory().await.expect("db");
        let pool = db.pool().clone();
        let storage = MemoryStorageProvider::new();
        let provider: Arc<dyn StorageProvider> = Arc::new(storage.clone());
        let folder_repo = Arc::new(FolderRepository::new(pool.clone()));
        let file_repo = Arc::new(FileRepository::new(pool.clone()));
        let pending = Arc::new(PendingDeletionRepository::new(pool));
        let janitor = Arc::new(BlobJanitor::new(
            provider.clone(),
            pending.clone(),
            file_repo.clone(),
            JanitorConfig::default(),
        ));
        Fixture {
            folders: FolderService::new(folder_repo.clone(), janitor.clone()),
            files: FileService::new(
                folder_repo,
                file_repo,
                provider,
                janitor,
                Default::default(),
            ),
            storage,
            pending,
            ctx: RequestContext::new(UserId::new("u1"), "u1@example.com", UserRole::User),
        }
    }

    fn create(name: &str, parent: Option<&FolderId>) -> CreateFolderRequest {
        CreateFolderRequest {
            name: name.to_string(),
            tags: vec![],
            parent_id: parent.cloned(),
        }
    }

    #[tokio::test]
    async fn test_create_nested_and_breadcrumbs() {
        let f = fixture().await;
        let math = f.folders.create_folder(&f.ctx, create("Math", None)).await.unwrap();
        let algebra = f
            .folders
            .create_folder(&f.ctx, create("Algebra", Some(&math.id)))
            .await
            .unwrap();

        let tree = f.folders.get_tree(&f.ctx).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].sub_folders[0].id, algebra.id);

        let crumbs = f.folders.breadcrumbs(&f.ctx, &algebra.id).await.unwrap();
        let names: Vec<&str> = crumbs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Math", "Algebra"]);
    }

    #[tokio::test]
    async fn test_create_under_missing_parent_is_not_found() {
        let f = fixture().await;
        let err = f
            .folders
            .create_folder(&f.ctx, create("Orphan", Some(&FolderId::new("ghost"))))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(f.folders.get_tree(&f.ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_name_yields_distinct_folders() {
        let f = fixture().await;
        let a = f.folders.create_folder(&f.ctx, create("Notes", None)).await.unwrap();
        let b = f.folders.create_folder(&f.ctx, create("Notes", None)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(f.folders.get_tree(&f.ctx).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_search() {
        let f = fixture().await;
        let folder = f.folders.create_folder(&f.ctx, create("Phys", None)).await.unwrap();
        let updated = f
            .folders
            .update_folder(
                &f.ctx,
                &folder.id,
                UpdateFolderRequest {
                    name: Some("Physics".into()),
                    tags: Some(vec!["lab".into()]),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Physics");

        let hits = f.folders.search(&f.ctx, "LAB").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, "/Physics");
        assert!(f.folders.search(&f.ctx, "chemistry").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_and_is_idempotent() {
        let f = fixture().await;
        let math = f.folders.create_folder(&f.ctx, create("Math", None)).await.unwrap();
        let sub = f
            .folders
            .create_folder(&f.ctx, create("Algebra", Some(&math.id)))
            .await
            .unwrap();
        f.files
            .upload_file(
                &f.ctx,
                UploadFileParams {
                    folder_id: sub.id.clone(),
                    file_name: "notes.txt".into(),
                    mime_type: None,
                    data: Bytes::from("x"),
                },
            )
            .await
            .unwrap();
        assert_eq!(f.storage.len(), 1);

        let outcome = f.folders.delete_folder(&f.ctx, &math.id).await.unwrap();
        assert_eq!(
            outcome,
            DeleteFolderOutcome {
                deleted: true,
                folders_removed: 2,
                files_removed: 1,
                blobs_deferred: 0,
            }
        );
        assert!(f.storage.is_empty());
        assert!(f.folders.get_tree(&f.ctx).await.unwrap().is_empty());

        let again = f.folders.delete_folder(&f.ctx, &math.id).await.unwrap();
        assert!(!again.deleted);
    }

    #[tokio::test]
    async fn test_delete_defers_failed_blob_deletes() {
        let f = fixture().await;
        let folder = f.folders.create_folder(&f.ctx, create("Bio", None)).await.unwrap();
        f.files
            .upload_file(
                &f.ctx,
                UploadFileParams {
                    folder_id: folder.id.clone(),
                    file_name: "cells.pdf".into(),
                    mime_type: None,
                    data: Bytes::from("pdf"),
                },
            )
            .await
            .unwrap();

        f.storage.set_fail_deletes(true);
        let outcome = f.folders.delete_folder(&f.ctx, &folder.id).await.unwrap();
        assert_eq!(outcome.blobs_deferred, 1);
        assert_eq!(f.pending.count().await.unwrap(), 1);
        assert!(f.folders.get_tree(&f.ctx).await.unwrap().is_empty());
    }
}
