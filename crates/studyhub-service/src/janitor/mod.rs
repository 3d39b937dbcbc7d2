//! Deferred blob deletion.
//!
//! Row deletions commit first; blob deletions follow. A blob that cannot be
//! deleted right away is queued in `pending_blob_deletions` and retried by
//! [`BlobJanitor::sweep`] on an interval.

pub mod sweeper;

pub use sweeper::{BlobJanitor, SweepReport};
