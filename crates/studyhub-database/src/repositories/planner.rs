//! Planner document repository.

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::types::UserId;
use studyhub_entity::planner::UserData;

/// Repository for the per-user planner document, stored as JSON.
#[derive(Debug, Clone)]
pub struct UserDataRepository {
    pool: SqlitePool,
}

impl UserDataRepository {
    /// Create a new planner repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Start a transaction on the underlying pool.
    pub async fn begin(&self) -> AppResult<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
    }

    /// Load a user's document, if one has been written.
    pub async fn find(&self, conn: &mut SqliteConnection, user_id: &UserId) -> AppResult<Option<UserData>> {
        let row: Option<Json<UserData>> =
            sqlx::query_scalar("SELECT document FROM user_data WHERE user_id = ?1")
                .bind(user_id)
                .fetch_optional(conn)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to load planner document", e)
                })?;
        Ok(row.map(|Json(data)| data))
    }

    /// Write a user's document, replacing any previous one.
    pub async fn save(&self, conn: &mut SqliteConnection, user_id: &UserId, data: &UserData) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO user_data (user_id, document, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT (user_id) DO UPDATE SET document = excluded.document, \
                updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(Json(data))
        .bind(Utc::now())
        .execute(conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save planner document", e))?;
        Ok(())
    }

    /// Delete a user's document. Returns `false` if there was none.
    pub async fn delete(&self, conn: &mut SqliteConnection, user_id: &UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM user_data WHERE user_id = ?1")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete planner document", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
