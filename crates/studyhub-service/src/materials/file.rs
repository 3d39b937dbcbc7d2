//! File upload, download, delete, and move within the materials tree.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use studyhub_core::config::StorageConfig;
use studyhub_core::error::AppError;
use studyhub_core::traits::storage::{ByteStream, StorageProvider};
use studyhub_core::types::{FileId, FolderId};
use studyhub_database::repositories::{FileRepository, FolderRepository};
use studyhub_entity::file::{StoredFile, blob_path, validate_file_name};
use studyhub_entity::folder::{FolderNode, FolderTree};
use studyhub_storage::mime::mime_from_path;
use studyhub_storage::paths::{clean_path, public_url};

use crate::context::RequestContext;
use crate::janitor::BlobJanitor;

const DEFAULT_MIME: &str = "application/octet-stream";

/// Handles file records and their blobs.
#[derive(Clone)]
pub struct FileService {
    /// Folder repository, for tree-level checks.
    folder_repo: Arc<FolderRepository>,
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Blob storage.
    storage: Arc<dyn StorageProvider>,
    /// Deferred blob deletion.
    janitor: Arc<BlobJanitor>,
    /// Storage configuration.
    config: StorageConfig,
}

impl std::fmt::Debug for FileService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileService").finish()
    }
}

/// Simple upload parameters (single request with full file body).
#[derive(Debug, Clone)]
pub struct UploadFileParams {
    /// Target folder ID.
    pub folder_id: FolderId,
    /// File name.
    pub file_name: String,
    /// MIME type reported by the client.
    pub mime_type: Option<String>,
    /// File contents.
    pub data: Bytes,
}

/// Request to move a file to another folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileRequest {
    /// Folder currently holding the file.
    pub source_folder_id: FolderId,
    /// Folder to move the file into.
    pub destination_folder_id: FolderId,
}

/// A file record with its content stream.
pub struct Download {
    /// The file record.
    pub file: StoredFile,
    /// Blob contents.
    pub stream: ByteStream,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download").field("file", &self.file).finish()
    }
}

/// Rows written by a nested-document import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub folders: usize,
    pub files: usize,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        folder_repo: Arc<FolderRepository>,
        file_repo: Arc<FileRepository>,
        storage: Arc<dyn StorageProvider>,
        janitor: Arc<BlobJanitor>,
        config: StorageConfig,
    ) -> Self {
        Self {
            folder_repo,
            file_repo,
            storage,
            janitor,
            config,
        }
    }

    /// Stores a blob and appends its record to the folder.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        params: UploadFileParams,
    ) -> Result<StoredFile, AppError> {
        let file_name = params.file_name.trim().to_string();
        validate_file_name(&file_name)?;

        let size = params.data.len() as u64;
        if size > self.config.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File size {size} exceeds maximum upload size of {} bytes",
                self.config.max_upload_size_bytes
            )));
        }

        let tree = self.folder_repo.tree().await?;
        if !tree.contains(&params.folder_id) {
            return Err(AppError::not_found(format!(
                "Folder '{}' not found",
                params.folder_id
            )));
        }
        if tree.file_named(&params.folder_id, &file_name).is_some() {
            return Err(AppError::conflict(format!(
                "A file named '{file_name}' already exists in this folder"
            )));
        }

        let storage_path = blob_path(&params.folder_id, &file_name);
        let mime_type = params
            .mime_type
            .filter(|m| !m.trim().is_empty() && m != DEFAULT_MIME)
            .or_else(|| mime_from_path(&file_name))
            .unwrap_or_else(|| DEFAULT_MIME.to_string());
        let record = StoredFile {
            id: FileId::generate(),
            folder_id: params.folder_id.clone(),
            name: file_name,
            url: public_url(&self.config.public_url_base, &storage_path),
            mime_type,
            storage_path,
            size_bytes: size as i64,
            uploaded_by: Some(ctx.uploader()),
            created_at: Utc::now(),
        };

        self.commit_upload(&record, params.data).await?;
        self.janitor.forget(&record.storage_path).await;

        info!(
            user_id = %ctx.user_id,
            folder_id = %record.folder_id,
            file_id = %record.id,
            size = record.size_bytes,
            "File uploaded"
        );
        Ok(record)
    }

    /// Claims the `(folder, name)` row, then writes the blob while the
    /// transaction holds the claim. A losing writer fails on the row before
    /// it can touch the path.
    async fn commit_upload(&self, record: &StoredFile, data: Bytes) -> Result<(), AppError> {
        let mut tx = self.folder_repo.begin().await?;
        let mut tree = self.folder_repo.load_tree(&mut tx).await?;
        tree.add_file(&record.folder_id, record.clone())?;
        self.file_repo.insert(&mut tx, record).await?;
        self.storage.write(&record.storage_path, data).await?;
        tx.commit().await.map_err(|e| {
            // The blob may now be unowned; orphan collection reclaims it.
            warn!(path = %record.storage_path, error = %e, "Upload commit failed after blob write");
            AppError::database(format!("Failed to commit upload: {e}"))
        })
    }

    /// Opens a file's content for reading.
    pub async fn download_file(
        &self,
        _ctx: &RequestContext,
        folder_id: &FolderId,
        file_id: &FileId,
    ) -> Result<Download, AppError> {
        let tree = self.folder_repo.tree().await?;
        let file = tree
            .file_in(folder_id, file_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("File '{file_id}' not found")))?;
        let stream = self.storage.read(&file.storage_path).await?;
        Ok(Download { file, stream })
    }

    /// Removes a file record and its blob.
    ///
    /// Returns `false` when the file was already gone.
    pub async fn delete_file(
        &self,
        ctx: &RequestContext,
        folder_id: &FolderId,
        file_id: &FileId,
    ) -> Result<bool, AppError> {
        let mut tx = self.folder_repo.begin().await?;
        let mut tree = self.folder_repo.load_tree(&mut tx).await?;
        let removed = match tree.remove_file(folder_id, file_id) {
            Ok(file) => file,
            Err(e) if e.is_not_found() => return Ok(false),
            Err(e) => return Err(e),
        };
        self.file_repo.delete(&mut tx, file_id).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit file delete: {e}")))?;

        let blob_deleted = self.janitor.delete_or_defer(&removed.storage_path).await;
        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            file_id = %file_id,
            blob_deleted,
            "File deleted"
        );
        Ok(true)
    }

    /// Moves a file between folders.
    ///
    /// The record is switched over in a transaction that also copies the
    /// blob to the destination path, so the copy only happens once the
    /// destination name is claimed. The old blob is removed after commit;
    /// a failed removal is deferred.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: &FileId,
        req: MoveFileRequest,
    ) -> Result<StoredFile, AppError> {
        let src = &req.source_folder_id;
        let dst = &req.destination_folder_id;
        if src == dst {
            return Err(AppError::validation(
                "Source and destination folders must differ",
            ));
        }

        let tree = self.folder_repo.tree().await?;
        let current = tree
            .file_in(src, file_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("File '{file_id}' not found")))?;
        if !tree.contains(dst) {
            return Err(AppError::not_found(format!(
                "Destination folder '{dst}' not found"
            )));
        }
        if tree.file_named(dst, &current.name).is_some() {
            return Err(AppError::conflict(format!(
                "A file named '{}' already exists in the destination",
                current.name
            )));
        }

        let new_path = blob_path(dst, &current.name);
        let moved = match self.commit_move(file_id, src, dst, &new_path).await {
            Ok(moved) => moved,
            Err(e) => {
                warn!(file_id = %file_id, error = %e, "File move aborted");
                return Err(e);
            }
        };
        self.janitor.forget(&new_path).await;

        let collected = self.janitor.delete_or_defer(&current.storage_path).await;
        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            from = %src,
            to = %dst,
            old_blob_deleted = collected,
            "File moved"
        );
        Ok(moved)
    }

    async fn commit_move(
        &self,
        file_id: &FileId,
        src: &FolderId,
        dst: &FolderId,
        new_path: &str,
    ) -> Result<StoredFile, AppError> {
        let url = public_url(&self.config.public_url_base, new_path);
        let mut tx = self.folder_repo.begin().await?;
        let mut tree = self.folder_repo.load_tree(&mut tx).await?;
        let old_path = tree
            .file_in(src, file_id)
            .map(|f| f.storage_path.clone())
            .ok_or_else(|| AppError::not_found(format!("File '{file_id}' not found")))?;
        tree.move_file(file_id, src, dst, |file| {
            file.relocated(dst.clone(), new_path.to_string(), url)
        })?;
        let moved = tree
            .file_in(dst, file_id)
            .cloned()
            .ok_or_else(|| AppError::internal("Moved file missing from destination"))?;
        self.file_repo.relocate(&mut tx, &moved).await?;
        self.storage.copy(&old_path, new_path).await?;
        tx.commit().await.map_err(|e| {
            warn!(path = %new_path, error = %e, "Move commit failed after blob copy");
            AppError::database(format!("Failed to commit file move: {e}"))
        })?;
        Ok(moved)
    }

    /// Loads a nested materials document into an empty tree. Admin only.
    ///
    /// Blobs are not copied; records keep the URLs and paths they carry, and
    /// files without a path get the conventional one.
    pub async fn import_nested(
        &self,
        ctx: &RequestContext,
        nodes: Vec<FolderNode>,
    ) -> Result<ImportSummary, AppError> {
        ctx.require_admin()?;
        let imported = FolderTree::from_nested(nodes)?;

        let mut tx = self.folder_repo.begin().await?;
        if !self.folder_repo.load_tree(&mut tx).await?.is_empty() {
            return Err(AppError::conflict(
                "Materials tree is not empty; import needs an empty tree",
            ));
        }

        let mut summary = ImportSummary::default();
        for (_, entry) in imported.walk() {
            self.folder_repo.insert(&mut tx, &entry.folder).await?;
            summary.folders += 1;
            for file in &entry.files {
                let mut file = file.clone();
                file.storage_path = clean_path(&file.storage_path);
                if file.url.is_empty() {
                    file.url = public_url(&self.config.public_url_base, &file.storage_path);
                }
                self.file_repo.insert(&mut tx, &file).await?;
                summary.files += 1;
            }
        }
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit import: {e}")))?;

        info!(
            user_id = %ctx.user_id,
            folders = summary.folders,
            files = summary.files,
            "Materials document imported"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use studyhub_core::error::ErrorKind;
    use studyhub_core::config::JanitorConfig;
    use studyhub_core::types::UserId;
    use studyhub_database::DatabasePool;
    use studyhub_database::repositories::PendingDeletionRepository;
    use studyhub_entity::user::UserRole;
    use studyhub_storage::providers::MemoryStorageProvider;

    use crate::janitor::SweepReport;
    use crate::materials::{CreateFolderRequest, FolderService};

    struct Fixture {
        folders: FolderService,
        files: FileService,
        storage: MemoryStorageProvider,
        pending: Arc<PendingDeletionRepository>,
        janitor: Arc<BlobJanitor>,
        ctx: RequestContext,
    }

    async fn fixture(max_upload: u64) -> Fixture {
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
        let config = StorageConfig {
            max_upload_size_bytes: max_upload,
            ..StorageConfig::default()
        };
        Fixture {
            folders: FolderService::new(folder_repo.clone(), janitor.clone()),
            files: FileService::new(folder_repo, file_repo, provider, janitor.clone(), config),
            storage,
            pending,
            janitor,
            ctx: RequestContext::new(UserId::new("u1"), "u1@example.com", UserRole::User),
        }
    }

    async fn folder(f: &Fixture, name: &str) -> FolderId {
        f.folders
            .create_folder(
                &f.ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    tags: vec![],
                    parent_id: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn upload(folder_id: &FolderId, name: &str, body: &'static str) -> UploadFileParams {
        UploadFileParams {
            folder_id: folder_id.clone(),
            file_name: name.to_string(),
            mime_type: None,
            data: Bytes::from(body),
        }
    }

    #[tokio::test]
    async fn test_upload_records_blob_and_uploader() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;

        let file = f.files.upload_file(&f.ctx, upload(&math, "notes.pdf", "pdf")).await.unwrap();
        assert_eq!(file.storage_path, format!("global/folders/{math}/notes.pdf"));
        assert_eq!(file.url, format!("/blobs/global/folders/{math}/notes.pdf"));
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.uploaded_by.as_ref().map(|u| u.email.as_str()), Some("u1@example.com"));
        assert!(f.storage.exists(&file.storage_path).await.unwrap());

        let mut download = f.files.download_file(&f.ctx, &math, &file.id).await.unwrap();
        let chunk = download.stream.next().await.unwrap().unwrap();
        assert_eq!(chunk, Bytes::from("pdf"));
    }

    #[tokio::test]
    async fn test_upload_rejections() {
        let f = fixture(4).await;
        let math = folder(&f, "Math").await;

        let too_big = f.files.upload_file(&f.ctx, upload(&math, "big.txt", "12345")).await;
        assert_eq!(too_big.unwrap_err().kind, ErrorKind::Validation);

        let missing = f
            .files
            .upload_file(&f.ctx, upload(&FolderId::new("ghost"), "a.txt", "a"))
            .await;
        assert_eq!(missing.unwrap_err().kind, ErrorKind::NotFound);

        f.files.upload_file(&f.ctx, upload(&math, "a.txt", "a")).await.unwrap();
        let dup = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "b")).await;
        assert_eq!(dup.unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(f.storage.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_file_is_idempotent() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let file = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "a")).await.unwrap();

        assert!(f.files.delete_file(&f.ctx, &math, &file.id).await.unwrap());
        assert!(f.storage.is_empty());
        assert!(!f.files.delete_file(&f.ctx, &math, &file.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_move_relocates_record_and_blob() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let physics = folder(&f, "Physics").await;
        let file = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "a")).await.unwrap();

        let moved = f
            .files
            .move_file(
                &f.ctx,
                &file.id,
                MoveFileRequest {
                    source_folder_id: math.clone(),
                    destination_folder_id: physics.clone(),
                },
            )
            .await
            .unwrap();

        assert_eq!(moved.id, file.id);
        assert_eq!(moved.folder_id, physics);
        assert!(!f.storage.exists(&file.storage_path).await.unwrap());
        assert!(f.storage.exists(&moved.storage_path).await.unwrap());

        let tree = f.folders.get_tree(&f.ctx).await.unwrap();
        let by_name = |name: &str| tree.iter().find(|n| n.name == name).unwrap().files.len();
        assert_eq!(by_name("Math"), 0);
        assert_eq!(by_name("Physics"), 1);
    }

    #[tokio::test]
    async fn test_move_to_same_folder_or_clashing_name_fails() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let physics = folder(&f, "Physics").await;
        let file = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "a")).await.unwrap();
        f.files.upload_file(&f.ctx, upload(&physics, "a.txt", "b")).await.unwrap();

        let same = f
            .files
            .move_file(
                &f.ctx,
                &file.id,
                MoveFileRequest {
                    source_folder_id: math.clone(),
                    destination_folder_id: math.clone(),
                },
            )
            .await;
        assert_eq!(same.unwrap_err().kind, ErrorKind::Validation);

        let clash = f
            .files
            .move_file(
                &f.ctx,
                &file.id,
                MoveFileRequest {
                    source_folder_id: math.clone(),
                    destination_folder_id: physics.clone(),
                },
            )
            .await;
        assert_eq!(clash.unwrap_err().kind, ErrorKind::Conflict);
        assert_eq!(
            f.storage.read_bytes(&format!("global/folders/{physics}/a.txt")).await.unwrap(),
            Bytes::from("b")
        );
    }

    #[tokio::test]
    async fn test_move_defers_old_blob_on_delete_failure() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let physics = folder(&f, "Physics").await;
        let file = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "a")).await.unwrap();

        f.storage.set_fail_deletes(true);
        let moved = f
            .files
            .move_file(
                &f.ctx,
                &file.id,
                MoveFileRequest {
                    source_folder_id: math,
                    destination_folder_id: physics,
                },
            )
            .await
            .unwrap();

        assert_eq!(f.pending.count().await.unwrap(), 1);
        assert!(f.storage.exists(&moved.storage_path).await.unwrap());
    }

    async fn read(f: &Fixture, path: &str) -> Bytes {
        f.storage.read_bytes(path).await.unwrap()
    }

    #[tokio::test]
    async fn test_reupload_over_queued_path_keeps_new_blob() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let old = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "v1")).await.unwrap();

        f.storage.set_fail_deletes(true);
        assert!(f.files.delete_file(&f.ctx, &math, &old.id).await.unwrap());
        assert_eq!(f.pending.count().await.unwrap(), 1);
        f.storage.set_fail_deletes(false);

        let new = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "v2")).await.unwrap();
        assert_eq!(new.storage_path, old.storage_path);
        assert_eq!(f.pending.count().await.unwrap(), 0);

        // A stale entry for the live path is dropped by the sweep, not run.
        f.pending.enqueue(&new.storage_path, "stale").await.unwrap();
        let report = f.janitor.sweep().await.unwrap();
        assert_eq!(report, SweepReport { deleted: 0, failed: 0, skipped: 1 });
        assert_eq!(f.pending.count().await.unwrap(), 0);

        assert_eq!(read(&f, &new.storage_path).await, Bytes::from("v2"));
        let mut download = f.files.download_file(&f.ctx, &math, &new.id).await.unwrap();
        assert_eq!(download.stream.next().await.unwrap().unwrap(), Bytes::from("v2"));
    }

    #[tokio::test]
    async fn test_move_onto_queued_path_keeps_moved_blob() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let physics = folder(&f, "Physics").await;
        let gone = f.files.upload_file(&f.ctx, upload(&physics, "a.txt", "old")).await.unwrap();

        f.storage.set_fail_deletes(true);
        f.files.delete_file(&f.ctx, &physics, &gone.id).await.unwrap();
        f.storage.set_fail_deletes(false);
        assert_eq!(f.pending.count().await.unwrap(), 1);

        let file = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "new")).await.unwrap();
        let moved = f
            .files
            .move_file(
                &f.ctx,
                &file.id,
                MoveFileRequest {
                    source_folder_id: math,
                    destination_folder_id: physics,
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.storage_path, gone.storage_path);
        assert_eq!(f.pending.count().await.unwrap(), 0);

        f.janitor.sweep().await.unwrap();
        assert_eq!(read(&f, &moved.storage_path).await, Bytes::from("new"));
    }

    #[tokio::test]
    async fn test_losing_writer_never_touches_claimed_blob() {
        let f = fixture(1024).await;
        let math = folder(&f, "Math").await;
        let physics = folder(&f, "Physics").await;
        let winner = f.files.upload_file(&f.ctx, upload(&math, "a.txt", "winner")).await.unwrap();

        // Same name, as if both uploads had passed the early clash check.
        let loser = StoredFile {
            id: FileId::generate(),
            ..winner.clone()
        };
        let err = f.files.commit_upload(&loser, Bytes::from("loser")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(read(&f, &winner.storage_path).await, Bytes::from("winner"));

        let other = f.files.upload_file(&f.ctx, upload(&physics, "a.txt", "mover")).await.unwrap();
        let err = f
            .files
            .commit_move(&other.id, &physics, &math, &winner.storage_path)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(read(&f, &winner.storage_path).await, Bytes::from("winner"));
        assert_eq!(read(&f, &other.storage_path).await, Bytes::from("mover"));
    }

    #[tokio::test]
    async fn test_import_nested_document() {
        let f = fixture(1024).await;
        let admin = RequestContext::new(UserId::new("root"), "root@example.com", UserRole::Admin);
        let math = FolderId::new("1");
        let legacy = StoredFile {
            id: FileId::new("f1"),
            folder_id: FolderId::default(),
            name: "notes.pdf".to_string(),
            url: String::new(),
            mime_type: "application/pdf".to_string(),
            storage_path: String::new(),
            size_bytes: 0,
            uploaded_by: None,
            created_at: Utc::now(),
        };
        let doc = vec![FolderNode {
            id: math.clone(),
            name: "Math".to_string(),
            tags: vec![],
            files: vec![legacy],
            created_at: Utc::now(),
            parent_id: None,
            sub_folders: vec![FolderNode {
                id: FolderId::new("2"),
                name: "Week 1".to_string(),
                tags: vec!["algebra".to_string()],
                files: vec![],
                created_at: Utc::now(),
                parent_id: None,
                sub_folders: vec![],
            }],
        }];

        let err = f.files.import_nested(&f.ctx, doc.clone()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let summary = f.files.import_nested(&admin, doc.clone()).await.unwrap();
        assert_eq!(summary, ImportSummary { folders: 2, files: 1 });

        let tree = f.folders.get_tree(&admin).await.unwrap();
        assert_eq!(tree[0].sub_folders[0].parent_id, Some(math.clone()));
        assert_eq!(tree[0].files[0].storage_path, "global/folders/1/notes.pdf");
        assert!(tree[0].files[0].url.ends_with("global/folders/1/notes.pdf"));

        let again = f.files.import_nested(&admin, doc).await.unwrap_err();
        assert_eq!(again.kind, ErrorKind::Conflict);
    }
}
