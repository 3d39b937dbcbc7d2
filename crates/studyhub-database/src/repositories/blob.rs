//! Deferred blob deletion queue.

use chrono::Utc;
use sqlx::SqlitePool;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_entity::blob::PendingBlobDeletion;

/// Repository for `pending_blob_deletions`.
#[derive(Debug, Clone)]
pub struct PendingDeletionRepository {
    pool: SqlitePool,
}

impl PendingDeletionRepository {
    /// Create a new pending deletion repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Queue a path. Re-queuing an existing path only refreshes its error.
    pub async fn enqueue(&self, path: &str, error: &str) -> AppResult<()> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO pending_blob_deletions (path, attempts, last_error, created_at, updated_at) \
             VALUES (?1, 0, ?2, ?3, ?3) \
             ON CONFLICT (path) DO UPDATE SET last_error = excluded.last_error, \
                updated_at = excluded.updated_at",
        )
        .bind(path)
        .bind(error)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to queue blob deletion", e)
        })?;
        Ok(())
    }

    /// Oldest queued paths that have not exhausted `max_attempts`.
    pub async fn list_due(&self, max_attempts: u32, limit: u32) -> AppResult<Vec<PendingBlobDeletion>> {
        sqlx::query_as::<_, PendingBlobDeletion>(
            "SELECT * FROM pending_blob_deletions WHERE attempts < ?1 \
             ORDER BY created_at ASC, path ASC LIMIT ?2",
        )
        .bind(i64::from(max_attempts))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list blob deletions", e)
        })
    }

    /// Record a failed attempt.
    pub async fn record_failure(&self, path: &str, error: &str) -> AppResult<()> {
        sqlx::query(
            "UPDATE pending_blob_deletions SET attempts = attempts + 1, last_error = ?1, \
                updated_at = ?2 WHERE path = ?3",
        )
        .bind(error)
        .bind(Utc::now())
        .bind(path)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update blob deletion", e)
        })?;
        Ok(())
    }

    /// Remove a path from the queue.
    pub async fn remove(&self, path: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM pending_blob_deletions WHERE path = ?1")
            .bind(path)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove blob deletion", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Paths whose retries are used up; sweeps no longer pick these.
    pub async fn list_exhausted(&self, max_attempts: u32) -> AppResult<Vec<PendingBlobDeletion>> {
        sqlx::query_as::<_, PendingBlobDeletion>(
            "SELECT * FROM pending_blob_deletions WHERE attempts >= ?1 \
             ORDER BY created_at ASC, path ASC",
        )
        .bind(i64::from(max_attempts))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list exhausted deletions", e)
        })
    }

    /// Drop every exhausted path from the queue. Returns how many were dropped.
    pub async fn purge_exhausted(&self, max_attempts: u32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM pending_blob_deletions WHERE attempts >= ?1")
            .bind(i64::from(max_attempts))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge blob deletions", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Number of queued paths.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM pending_blob_deletions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count blob deletions", e)
            })
    }
}
