//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::SqlitePool;

use studyhub_auth::JwtDecoder;
use studyhub_core::config::AppConfig;
use studyhub_core::traits::storage::StorageProvider;
use studyhub_service::{
    AdminService, BlobJanitor, ContactService, FileService, FolderService, PlannerService,
    UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,

    /// SQLite connection pool
    pub db_pool: SqlitePool,
    /// Blob storage provider
    pub storage: Arc<dyn StorageProvider>,
    /// Bearer token verifier
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Deferred blob deletion
    pub janitor: Arc<BlobJanitor>,

    pub user_service: Arc<UserService>,
    pub folder_service: Arc<FolderService>,
    pub file_service: Arc<FileService>,
    pub planner_service: Arc<PlannerService>,
    pub contact_service: Arc<ContactService>,
    pub admin_service: Arc<AdminService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.storage.provider_type())
            .finish_non_exhaustive()
    }
}
