//! User profile repository implementation.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::types::UserId;
use studyhub_entity::user::{UserProfile, UserRole};

/// Repository for user profile rows.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: &UserId) -> AppResult<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Create the profile on first sight, otherwise refresh its email.
    ///
    /// The role is only taken from `role` when the row is created; after
    /// that the stored role is authoritative. Ids removed by an admin are
    /// refused with `Authorization`.
    pub async fn upsert(&self, id: &UserId, email: &str, role: UserRole) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "INSERT INTO users (id, email, username, role, created_at) \
             SELECT ?1, ?2, NULL, ?3, ?4 \
             WHERE NOT EXISTS (SELECT 1 FROM removed_users WHERE id = ?1) \
             ON CONFLICT (id) DO UPDATE SET email = excluded.email \
             RETURNING *",
        )
        .bind(id)
        .bind(email)
        .bind(role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert user", e))?
        .ok_or_else(|| AppError::authorization(format!("Account '{id}' has been removed")))
    }

    /// List users, optionally filtered by an email or username substring.
    pub async fn list(&self, search: Option<&str>) -> AppResult<Vec<UserProfile>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"));

        let result = match pattern {
            Some(pattern) => sqlx::query_as::<_, UserProfile>(
                "SELECT * FROM users WHERE email LIKE ?1 OR username LIKE ?1 \
                 ORDER BY created_at ASC, id ASC",
            )
            .bind(pattern)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, UserProfile>(
                "SELECT * FROM users ORDER BY created_at ASC, id ASC",
            )
            .fetch_all(&self.pool)
            .await,
        };
        result.map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    /// Update username and/or role. `None` leaves a field unchanged.
    pub async fn update(
        &self,
        id: &UserId,
        username: Option<&str>,
        role: Option<UserRole>,
    ) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            "UPDATE users SET username = COALESCE(?1, username), role = COALESCE(?2, role) \
             WHERE id = ?3 RETURNING *",
        )
        .bind(username)
        .bind(role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update user", e))?
        .ok_or_else(|| AppError::not_found(format!("User '{id}' not found")))
    }

    /// Delete a user profile. Returns `false` if it did not exist.
    pub async fn delete(&self, conn: &mut SqliteConnection, id: &UserId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete user", e))?;

        sqlx::query(
            "INSERT INTO removed_users (id, removed_at) VALUES (?1, ?2) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record removed user", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count users, and how many of them are admins.
    pub async fn counts(&self) -> AppResult<(i64, i64)> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN role = 'admin' THEN 1 ELSE 0 END), 0) FROM users",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count users", e))
    }
}
