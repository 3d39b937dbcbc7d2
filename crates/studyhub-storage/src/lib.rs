//! # studyhub-storage
//!
//! Blob storage provider implementations for StudyHub: local filesystem,
//! process memory and, behind the `s3` feature, S3-compatible object stores.
//! Also hosts the blob path and public URL conventions.

pub mod mime;
pub mod paths;
pub mod providers;

use std::sync::Arc;

use tracing::info;

use studyhub_core::config::StorageConfig;
use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::StorageProvider;

pub use mime::mime_from_path;
pub use providers::{LocalStorageProvider, MemoryStorageProvider};

/// Build the provider selected by `config.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    info!(provider = %config.provider, "Initializing blob storage");
    match config.provider.as_str() {
        "local" => Ok(Arc::new(
            LocalStorageProvider::new(&config.local.root_path).await?,
        )),
        "memory" => Ok(Arc::new(MemoryStorageProvider::new())),
        #[cfg(feature = "s3")]
        "s3" => Ok(Arc::new(
            providers::s3::S3StorageProvider::new(&config.s3).await?,
        )),
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::configuration(
            "Storage provider 's3' requires the `s3` feature",
        )),
        other => Err(AppError::configuration(format!(
            "Unknown storage provider '{other}'. Expected one of: local, memory, s3"
        ))),
    }
}
