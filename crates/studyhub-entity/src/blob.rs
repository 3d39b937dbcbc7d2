//! Bookkeeping for blobs whose deletion must be retried.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A blob path queued for deferred deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PendingBlobDeletion {
    /// Object path within blob storage.
    pub path: String,
    /// Failed deletion attempts so far.
    pub attempts: i64,
    /// Message of the most recent failure.
    pub last_error: Option<String>,
    /// When the path was first queued.
    pub created_at: DateTime<Utc>,
    /// When the row last changed.
    pub updated_at: DateTime<Utc>,
}
