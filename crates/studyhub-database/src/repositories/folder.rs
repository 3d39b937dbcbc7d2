//! Folder repository implementation.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, Sqlite, SqliteConnection, SqlitePool, Transaction};

use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::result::AppResult;
use studyhub_core::types::{FolderId, UserId};
use studyhub_entity::folder::{Folder, FolderTree};

use super::file::fetch_all_files;

#[derive(Debug, FromRow)]
struct FolderRow {
    id: FolderId,
    parent_id: Option<FolderId>,
    name: String,
    tags: Json<Vec<String>>,
    created_by: Option<UserId>,
    created_at: DateTime<Utc>,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            tags: row.tags.0,
            parent_id: row.parent_id,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

/// Repository for folder rows and whole-tree loads.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: SqlitePool,
}

impl FolderRepository {
    /// Create a new folder repository.
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

    /// Load every folder and file and index them as a tree.
    pub async fn load_tree(&self, conn: &mut SqliteConnection) -> AppResult<FolderTree> {
        let folders = sqlx::query_as::<_, FolderRow>(
            "SELECT id, parent_id, name, tags, created_by, created_at FROM folders \
             ORDER BY position ASC, created_at ASC, id ASC",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load folders", e))?;

        let files = fetch_all_files(conn).await?;
        FolderTree::from_parts(folders.into_iter().map(Folder::from).collect(), files)
    }

    /// Load the tree outside of any transaction.
    pub async fn tree(&self) -> AppResult<FolderTree> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
        })?;
        self.load_tree(&mut conn).await
    }

    /// Insert a folder as the last child of its parent.
    pub async fn insert(&self, conn: &mut SqliteConnection, folder: &Folder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folders (id, parent_id, name, tags, position, created_by, created_at) \
             VALUES (?1, ?2, ?3, ?4, \
                (SELECT COALESCE(MAX(position), -1) + 1 FROM folders WHERE parent_id IS ?2), \
                ?5, ?6)",
        )
        .bind(&folder.id)
        .bind(&folder.parent_id)
        .bind(&folder.name)
        .bind(Json(&folder.tags))
        .bind(&folder.created_by)
        .bind(folder.created_at)
        .execute(conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Folder id '{}' already exists", folder.id))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::not_found("Parent folder not found")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create folder", e),
        })?;
        Ok(())
    }

    /// Persist a folder's name and tags.
    pub async fn update(&self, conn: &mut SqliteConnection, folder: &Folder) -> AppResult<()> {
        let result = sqlx::query("UPDATE folders SET name = ?1, tags = ?2 WHERE id = ?3")
            .bind(&folder.name)
            .bind(Json(&folder.tags))
            .bind(&folder.id)
            .execute(conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update folder", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Folder '{}' not found", folder.id)));
        }
        Ok(())
    }

    /// Delete folders by id. Files and descendants cascade.
    pub async fn delete_many(&self, conn: &mut SqliteConnection, ids: &[FolderId]) -> AppResult<u64> {
        let mut deleted = 0;
        for id in ids {
            let result = sqlx::query("DELETE FROM folders WHERE id = ?1")
                .bind(id)
                .execute(&mut *conn)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete folder", e)
                })?;
            deleted += result.rows_affected();
        }
        Ok(deleted)
    }

    /// Total number of folders.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM folders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count folders", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DatabasePool;

    async fn repo() -> FolderRepository {
        let db = DatabasePool::in_memory().await.expect("db");
        FolderRepository::new(db.into_pool())
    }

    #[tokio::test]
    async fn test_insert_appends_in_order_and_loads_tree() {
        let repo = repo().await;
        let math = Folder::new("Math", vec!["core".into()], None, None);
        let week1 = Folder::new("Week 1", vec![], Some(math.id.clone()), None);
        let week2 = Folder::new("Week 2", vec![], Some(math.id.clone()), None);
        let physics = Folder::new("Physics", vec![], None, None);

        let mut tx = repo.begin().await.unwrap();
        for f in [&math, &week1, &week2, &physics] {
            repo.insert(&mut tx, f).await.unwrap();
        }
        tx.commit().await.unwrap();

        let tree = repo.tree().await.unwrap();
        assert_eq!(tree.roots(), &[math.id.clone(), physics.id.clone()]);
        assert_eq!(
            tree.find(&math.id).unwrap().children,
            vec![week1.id.clone(), week2.id.clone()]
        );
        assert_eq!(tree.folder(&math.id).unwrap().tags, vec!["core"]);
        assert_eq!(repo.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_insert_with_missing_parent_is_not_found() {
        let repo = repo().await;
        let orphan = Folder::new("Orphan", vec![], Some(FolderId::new("ghost")), None);
        let mut conn = repo.pool.acquire().await.unwrap();
        let err = repo.insert(&mut conn, &orphan).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_descendants() {
        let repo = repo().await;
        let math = Folder::new("Math", vec![], None, None);
        let week1 = Folder::new("Week 1", vec![], Some(math.id.clone()), None);
        let mut conn = repo.pool.acquire().await.unwrap();
        repo.insert(&mut conn, &math).await.unwrap();
        repo.insert(&mut conn, &week1).await.unwrap();

        repo.delete_many(&mut conn, &[math.id.clone()]).await.unwrap();
        drop(conn);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo().await;
        let mut conn = repo.pool.acquire().await.unwrap();
        let ghost = Folder::new("Ghost", vec![], None, None);
        assert!(repo.update(&mut conn, &ghost).await.unwrap_err().is_not_found());
    }
}
