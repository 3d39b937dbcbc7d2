//! File repository implementation.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::types::{FileId, FolderId, UserId};
use studyhub_entity::file::StoredFile;
use studyhub_entity::user::Uploader;

const FILE_COLUMNS: &str = "id, folder_id, name, url, mime_type, storage_path, size_bytes, \
                            uploaded_by_id, uploaded_by_email, created_at";

#[derive(Debug, FromRow)]
struct FileRow {
    id: FileId,
    folder_id: FolderId,
    name: String,
    url: String,
    mime_type: String,
    storage_path: String,
    size_bytes: i64,
    uploaded_by_id: Option<UserId>,
    uploaded_by_email: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<FileRow> for StoredFile {
    fn from(row: FileRow) -> Self {
        let uploaded_by = match (row.uploaded_by_id, row.uploaded_by_email) {
            (Some(id), Some(email)) => Some(Uploader { id, email }),
            _ => None,
        };
        Self {
            id: row.id,
            folder_id: row.folder_id,
            name: row.name,
            url: row.url,
            mime_type: row.mime_type,
            storage_path: row.storage_path,
            size_bytes: row.size_bytes,
            uploaded_by,
            created_at: row.created_at,
        }
    }
}

/// Every file, in per-folder order.
pub(crate) async fn fetch_all_files(conn: &mut SqliteConnection) -> AppResult<Vec<StoredFile>> {
    let rows = sqlx::query_as::<_, FileRow>(&format!(
        "SELECT {FILE_COLUMNS} FROM files ORDER BY position ASC, created_at ASC, id ASC"
    ))
    .fetch_all(conn)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load files", e))?;
    Ok(rows.into_iter().map(StoredFile::from).collect())
}

fn map_write_error(e: sqlx::Error, file: &StoredFile, action: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => AppError::conflict(
            format!("A file named '{}' already exists in this folder", file.name),
        ),
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::not_found(format!("Folder '{}' not found", file.folder_id))
        }
        _ => AppError::with_source(ErrorKind::Database, format!("Failed to {action} file"), e),
    }
}

/// Repository for file rows.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: &FileId) -> AppResult<Option<StoredFile>> {
        let row = sqlx::query_as::<_, FileRow>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))?;
        Ok(row.map(StoredFile::from))
    }

    /// Insert a file as the last entry of its folder.
    pub async fn insert(&self, conn: &mut SqliteConnection, file: &StoredFile) -> AppResult<()> {
        let (uploader_id, uploader_email) = match &file.uploaded_by {
            Some(u) => (Some(&u.id), Some(u.email.as_str())),
            None => (None, None),
        };
        sqlx::query(
            "INSERT INTO files (id, folder_id, name, url, mime_type, storage_path, size_bytes, \
                position, uploaded_by_id, uploaded_by_email, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, \
                (SELECT COALESCE(MAX(position), -1) + 1 FROM files WHERE folder_id = ?2), \
                ?8, ?9, ?10)",
        )
        .bind(&file.id)
        .bind(&file.folder_id)
        .bind(&file.name)
        .bind(&file.url)
        .bind(&file.mime_type)
        .bind(&file.storage_path)
        .bind(file.size_bytes)
        .bind(uploader_id)
        .bind(uploader_email)
        .bind(file.created_at)
        .execute(conn)
        .await
        .map_err(|e| map_write_error(e, file, "create"))?;
        Ok(())
    }

    /// Re-home a file row under its new folder, path and URL, appending it
    /// to the destination's order.
    pub async fn relocate(&self, conn: &mut SqliteConnection, file: &StoredFile) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE files SET folder_id = ?1, storage_path = ?2, url = ?3, \
                position = (SELECT COALESCE(MAX(position), -1) + 1 FROM files WHERE folder_id = ?1) \
             WHERE id = ?4",
        )
        .bind(&file.folder_id)
        .bind(&file.storage_path)
        .bind(&file.url)
        .bind(&file.id)
        .execute(conn)
        .await
        .map_err(|e| map_write_error(e, file, "move"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("File '{}' not found", file.id)));
        }
        Ok(())
    }

    /// Delete a file row. Returns `false` if it did not exist.
    pub async fn delete(&self, conn: &mut SqliteConnection, id: &FileId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?1")
            .bind(id)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether any file row points at `path`.
    pub async fn is_referenced(&self, path: &str) -> AppResult<bool> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM files WHERE storage_path = ?1)")
            .bind(path)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check file path", e))
    }

    /// Every blob path referenced by a file row.
    pub async fn storage_paths(&self) -> AppResult<Vec<String>> {
        sqlx::query_scalar("SELECT storage_path FROM files")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file paths", e))
    }

    /// Total number of files and their combined size in bytes.
    pub async fn totals(&self) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(size_bytes), 0) FROM files",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))
    }
}
