use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use studyhub_core::config::JanitorConfig;
use studyhub_core::result::AppResult;
use studyhub_core::traits::storage::StorageProvider;
use studyhub_database::repositories::{FileRepository, PendingDeletionRepository};
use studyhub_entity::blob::PendingBlobDeletion;
use studyhub_storage::paths::clean_path;

/// Prefix under which all materials blobs live.
const MATERIALS_PREFIX: &str = "global/folders";

/// Queued paths handled per sweep.
const SWEEP_BATCH: u32 = 100;

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Blobs deleted and dequeued.
    pub deleted: usize,
    /// Blobs whose deletion failed again.
    pub failed: usize,
    /// Queued paths dropped because a file row owns them again.
    pub skipped: usize,
}

/// Deletes blobs, deferring failures to a persistent retry queue.
#[derive(Clone)]
pub struct BlobJanitor {
    storage: Arc<dyn StorageProvider>,
    pending: Arc<PendingDeletionRepository>,
    file_repo: Arc<FileRepository>,
    config: JanitorConfig,
}

impl std::fmt::Debug for BlobJanitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobJanitor")
            .field("provider", &self.storage.provider_type())
            .field("config", &self.config)
            .finish()
    }
}

impl BlobJanitor {
    /// Creates a new janitor.
    pub fn new(
        storage: Arc<dyn StorageProvider>,
        pending: Arc<PendingDeletionRepository>,
        file_repo: Arc<FileRepository>,
        config: JanitorConfig,
    ) -> Self {
        Self {
            storage,
            pending,
            file_repo,
            config,
        }
    }

    /// Delete a blob now, or queue it for a later sweep.
    ///
    /// A path that a file row references is left alone. Returns `false`
    /// only when the deletion was queued.
    pub async fn delete_or_defer(&self, path: &str) -> bool {
        let path = clean_path(path);
        if path.is_empty() {
            return true;
        }
        match self.file_repo.is_referenced(&path).await {
            Ok(true) => {
                debug!(path = %path, "Blob owned by a file row, not deleting");
                return true;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(path = %path, error = %e, "Blob ownership check failed, deferring");
                self.defer(&path, &e.message).await;
                return false;
            }
        }
        match self.storage.delete(&path).await {
            Ok(()) => {
                debug!(path = %path, "Blob deleted");
                true
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Blob delete failed, deferring");
                self.defer(&path, &e.message).await;
                false
            }
        }
    }

    async fn defer(&self, path: &str, reason: &str) {
        if let Err(e) = self.pending.enqueue(path, reason).await {
            error!(path = %path, error = %e, "Failed to queue blob deletion");
        }
    }

    /// Drop a queued deletion for a path that a file row now owns.
    pub async fn forget(&self, path: &str) {
        let path = clean_path(path);
        match self.pending.remove(&path).await {
            Ok(true) => debug!(path = %path, "Queued blob deletion dropped"),
            Ok(false) => {}
            Err(e) => warn!(path = %path, error = %e, "Failed to drop queued blob deletion"),
        }
    }

    /// Retry queued deletions once.
    pub async fn sweep(&self) -> AppResult<SweepReport> {
        let due = self
            .pending
            .list_due(self.config.max_attempts, SWEEP_BATCH)
            .await?;
        let mut report = SweepReport::default();
        if due.is_empty() {
            return Ok(report);
        }
        let referenced: HashSet<String> = self
            .file_repo
            .storage_paths()
            .await?
            .into_iter()
            .map(|p| clean_path(&p))
            .collect();

        for entry in due {
            if referenced.contains(&entry.path) {
                self.pending.remove(&entry.path).await?;
                report.skipped += 1;
                debug!(path = %entry.path, "Queued blob is owned by a file row, dropped");
                continue;
            }
            match self.storage.delete(&entry.path).await {
                Ok(()) => {
                    self.pending.remove(&entry.path).await?;
                    report.deleted += 1;
                }
                Err(e) => {
                    self.pending.record_failure(&entry.path, &e.message).await?;
                    report.failed += 1;
                    if entry.attempts + 1 >= i64::from(self.config.max_attempts) {
                        error!(
                            path = %entry.path,
                            attempts = entry.attempts + 1,
                            "Blob deletion exhausted retries"
                        );
                    }
                }
            }
        }

        info!(
            deleted = report.deleted,
            failed = report.failed,
            skipped = report.skipped,
            "Janitor sweep finished"
        );
        Ok(report)
    }

    /// Queued deletions that sweeps have given up on.
    pub async fn exhausted(&self) -> AppResult<Vec<PendingBlobDeletion>> {
        self.pending.list_exhausted(self.config.max_attempts).await
    }

    /// Forget every exhausted deletion. The blobs stay in storage.
    pub async fn purge_exhausted(&self) -> AppResult<u64> {
        let purged = self.pending.purge_exhausted(self.config.max_attempts).await?;
        if purged > 0 {
            info!(purged, "Exhausted blob deletions purged");
        }
        Ok(purged)
    }

    /// Blobs under the materials prefix that no file row references and
    /// that are older than `min_age`.
    ///
    /// The age filter leaves room for uploads and moves whose blob is
    /// written before the row commits.
    pub async fn find_orphans(&self, min_age: Duration) -> AppResult<Vec<String>> {
        let referenced: HashSet<String> = self
            .file_repo
            .storage_paths()
            .await?
            .into_iter()
            .map(|p| clean_path(&p))
            .collect();
        let cutoff = chrono::Duration::from_std(min_age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age));

        let objects = self.storage.list(MATERIALS_PREFIX).await?;
        Ok(objects
            .into_iter()
            .filter(|o| !referenced.contains(&o.path))
            .filter(|o| match (cutoff, o.last_modified) {
                (Some(cutoff), Some(modified)) => modified <= cutoff,
                (None, _) => false,
                (_, None) => true,
            })
            .map(|o| o.path)
            .collect())
    }

    /// Delete orphaned blobs older than `min_age`. Returns how many were
    /// removed now; failures are queued.
    pub async fn collect_orphans(&self, min_age: Duration) -> AppResult<usize> {
        let orphans = self.find_orphans(min_age).await?;
        let mut removed = 0;
        for path in &orphans {
            if self.delete_or_defer(path).await {
                removed += 1;
            }
        }
        if !orphans.is_empty() {
            info!(found = orphans.len(), removed, "Orphaned blobs collected");
        }
        Ok(removed)
    }

    /// Sweep on the configured interval until `cancel` flips to `true`.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let period = Duration::from_secs(self.config.interval_seconds.max(1));
        let mut ticker = time::interval(period);
        info!(interval_seconds = period.as_secs(), "Blob janitor started");

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep().await {
                        error!(error = %e, "Janitor sweep failed");
                    }
                }
            }
        }

        info!("Blob janitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use studyhub_database::DatabasePool;
    use studyhub_storage::providers::memory::MemoryStorageProvider;

    async fn janitor() -> (MemoryStorageProvider, Arc<PendingDeletionRepository>, BlobJanitor) {
        let db = DatabasePool::in_memory().await.expect("db");
        let storage = MemoryStorageProvider::new();
        let pending = Arc::new(PendingDeletionRepository::new(db.pool().clone()));
        let files = Arc::new(FileRepository::new(db.pool().clone()));
        let config = JanitorConfig {
            max_attempts: 2,
            ..JanitorConfig::default()
        };
        let janitor = BlobJanitor::new(Arc::new(storage.clone()), pending.clone(), files, config);
        (storage, pending, janitor)
    }

    #[tokio::test]
    async fn test_failed_delete_is_queued_then_swept() {
        let (storage, pending, janitor) = janitor().await;
        storage
            .write("global/folders/a/x.pdf", Bytes::from("x"))
            .await
            .unwrap();

        storage.set_fail_deletes(true);
        assert!(!janitor.delete_or_defer("global//folders/a/x.pdf").await);
        assert_eq!(pending.count().await.unwrap(), 1);

        let report = janitor.sweep().await.unwrap();
        assert_eq!(report, SweepReport { deleted: 0, failed: 1, skipped: 0 });

        storage.set_fail_deletes(false);
        let report = janitor.sweep().await.unwrap();
        assert_eq!(report, SweepReport { deleted: 1, failed: 0, skipped: 0 });
        assert_eq!(pending.count().await.unwrap(), 0);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_entries_are_skipped() {
        let (storage, pending, janitor) = janitor().await;
        storage.set_fail_deletes(true);
        janitor.delete_or_defer("global/folders/a/y.pdf").await;

        janitor.sweep().await.unwrap();
        janitor.sweep().await.unwrap();
        let report = janitor.sweep().await.unwrap();
        assert_eq!(report, SweepReport::default());
        assert_eq!(pending.count().await.unwrap(), 1);

        let exhausted = janitor.exhausted().await.unwrap();
        assert_eq!(exhausted[0].path, "global/folders/a/y.pdf");
        assert_eq!(janitor.purge_exhausted().await.unwrap(), 1);
        assert_eq!(pending.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_orphans_respect_min_age() {
        let (storage, _pending, janitor) = janitor().await;
        storage
            .write("global/folders/gone/old.txt", Bytes::from("x"))
            .await
            .unwrap();

        assert!(janitor.find_orphans(Duration::from_secs(3600)).await.unwrap().is_empty());
        let orphans = janitor.find_orphans(Duration::ZERO).await.unwrap();
        assert_eq!(orphans, vec!["global/folders/gone/old.txt".to_string()]);

        assert_eq!(janitor.collect_orphans(Duration::ZERO).await.unwrap(), 1);
        assert!(storage.is_empty());
    }
}
