//! Application builder: wires repositories, services, router, and
//! background tasks into a running server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;

use studyhub_auth::JwtDecoder;
use studyhub_core::config::AppConfig;
use studyhub_core::error::{AppError, ErrorKind};
use studyhub_core::traits::storage::StorageProvider;
use studyhub_database::DatabasePool;
use studyhub_database::repositories::{
    ContactRepository, FileRepository, FolderRepository, PendingDeletionRepository,
    UserDataRepository, UserRepository,
};
use studyhub_service::{
    AdminRepositories, AdminService, BlobJanitor, ContactService, FileService, FolderService,
    PlannerService, UserService,
};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Wires every repository and service over an open database and storage
/// provider.
pub fn build_state(
    config: AppConfig,
    db: &DatabasePool,
    storage: Arc<dyn StorageProvider>,
) -> AppState {
    let pool = db.pool().clone();

    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let planner_repo = Arc::new(UserDataRepository::new(pool.clone()));
    let folder_repo = Arc::new(FolderRepository::new(pool.clone()));
    let file_repo = Arc::new(FileRepository::new(pool.clone()));
    let contact_repo = Arc::new(ContactRepository::new(pool.clone()));
    let pending_repo = Arc::new(PendingDeletionRepository::new(pool.clone()));

    let janitor = Arc::new(BlobJanitor::new(
        Arc::clone(&storage),
        Arc::clone(&pending_repo),
        Arc::clone(&file_repo),
        config.janitor.clone(),
    ));

    let folder_service = Arc::new(FolderService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&janitor),
    ));
    let file_service = Arc::new(FileService::new(
        Arc::clone(&folder_repo),
        Arc::clone(&file_repo),
        Arc::clone(&storage),
        Arc::clone(&janitor),
        config.storage.clone(),
    ));
    let admin_service = Arc::new(AdminService::new(
        AdminRepositories {
            users: Arc::clone(&user_repo),
            planner: Arc::clone(&planner_repo),
            folders: folder_repo,
            files: file_repo,
            contact: Arc::clone(&contact_repo),
            pending_deletions: pending_repo,
        },
        Arc::clone(&folder_service),
        config.storage.max_upload_size_bytes,
    ));

    AppState {
        jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
        db_pool: pool,
        storage,
        janitor,
        user_service: Arc::new(UserService::new(user_repo)),
        folder_service,
        file_service,
        planner_service: Arc::new(PlannerService::new(planner_repo)),
        contact_service: Arc::new(ContactService::new(contact_repo)),
        admin_service,
        config: Arc::new(config),
    }
}

/// Runs the StudyHub server until Ctrl+C.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting StudyHub server...");

    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in default; set a real secret");
    }

    tracing::info!(url = %config.database.url, "Connecting to database...");
    let db = DatabasePool::connect_and_migrate(&config.database).await?;

    tracing::info!(provider = %config.storage.provider, "Initializing blob storage...");
    let storage = studyhub_storage::build_provider(&config.storage).await?;

    let addr = config.server.bind_address();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let janitor_enabled = config.janitor.enabled;
    let state = build_state(config, &db, storage);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let janitor_handle = if janitor_enabled {
        let janitor = Arc::clone(&state.janitor);
        let cancel = shutdown_rx.clone();
        Some(tokio::spawn(async move { janitor.run(cancel).await }))
    } else {
        tracing::info!("Blob janitor disabled");
        None
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Configuration, format!("Failed to bind {addr}"), e)
        })?;

    tracing::info!("StudyHub server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = janitor_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Blob janitor did not stop within the grace period");
        }
    }

    db.close().await;
    tracing::info!("StudyHub server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
