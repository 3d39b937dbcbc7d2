//! Contact request repository implementation.

use sqlx::SqlitePool;

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::types::ContactRequestId;
use studyhub_entity::contact::{ContactRequest, ContactStatus};

/// Repository for contact form submissions.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: SqlitePool,
}

impl ContactRepository {
    /// Create a new contact repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a new request.
    pub async fn insert(&self, request: &ContactRequest) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO contact_requests (id, user_id, name, email, message, status, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&request.id)
        .bind(&request.user_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.message)
        .bind(request.status)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to store contact request", e)
        })?;
        Ok(())
    }

    /// List requests, newest first, optionally filtered by status.
    pub async fn list(&self, status: Option<ContactStatus>) -> AppResult<Vec<ContactRequest>> {
        sqlx::query_as::<_, ContactRequest>(
            "SELECT * FROM contact_requests WHERE ?1 IS NULL OR status = ?1 \
             ORDER BY created_at DESC, id ASC",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list contact requests", e)
        })
    }

    /// Change the status of a request.
    pub async fn set_status(
        &self,
        id: &ContactRequestId,
        status: ContactStatus,
    ) -> AppResult<ContactRequest> {
        sqlx::query_as::<_, ContactRequest>(
            "UPDATE contact_requests SET status = ?1 WHERE id = ?2 RETURNING *",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update contact request", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Contact request '{id}' not found")))
    }

    /// Number of requests still pending.
    pub async fn count_pending(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM contact_requests WHERE status = 'pending'")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count contact requests", e)
            })
    }
}
