//! In-process blob storage, used for tests and throwaway deployments.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::storage::{ByteStream, StorageObjectMeta, StorageProvider};

use crate::mime::mime_from_path;
use crate::paths::clean_path;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    modified: DateTime<Utc>,
}

/// Blob storage held in a concurrent map.
///
/// Cloning shares the underlying map. `set_fail_deletes` makes every
/// delete fail, for exercising deferred deletion.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageProvider {
    objects: Arc<DashMap<String, StoredObject>>,
    fail_deletes: Arc<AtomicBool>,
}

impl MemoryStorageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Toggle failure injection for `delete`.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn get(&self, path: &str) -> AppResult<StoredObject> {
        self.objects
            .get(&clean_path(path))
            .map(|o| o.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    fn meta(path: &str, object: &StoredObject) -> StorageObjectMeta {
        StorageObjectMeta {
            path: path.to_string(),
            size_bytes: object.data.len() as u64,
            mime_type: mime_from_path(path),
            last_modified: Some(object.modified),
        }
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let data = self.get(path)?.data;
        Ok(Box::pin(futures::stream::once(async move {
            Ok::<_, std::io::Error>(data)
        })))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        Ok(self.get(path)?.data)
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.objects.insert(
            clean_path(path),
            StoredObject {
                data,
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Injected delete failure: {path}")));
        }
        self.objects.remove(&clean_path(path));
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str) -> AppResult<()> {
        let object = self.get(from)?;
        self.objects.insert(
            clean_path(to),
            StoredObject {
                data: object.data,
                modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(&clean_path(path)))
    }

    async fn metadata(&self, path: &str) -> AppResult<StorageObjectMeta> {
        let object = self.get(path)?;
        Ok(Self::meta(&clean_path(path), &object))
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StorageObjectMeta>> {
        let prefix = clean_path(prefix);
        let mut entries: Vec<StorageObjectMeta> = self
            .objects
            .iter()
            .filter(|e| {
                prefix.is_empty()
                    || e.key() == &prefix
                    || e.key().starts_with(&format!("{prefix}/"))
            })
            .map(|e| Self::meta(e.key(), e.value()))
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
