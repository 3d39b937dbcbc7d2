//! Nested and flat renderings of the folder tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyhub_core::types::FolderId;

use crate::file::StoredFile;

/// A folder rendered in the nested document shape:
/// `{id, name, tags, files, createdAt, parentId, subFolders}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Files owned by this folder, in order.
    #[serde(default)]
    pub files: Vec<StoredFile>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Parent folder ID.
    #[serde(default)]
    pub parent_id: Option<FolderId>,
    /// Child folders, in order.
    #[serde(default)]
    pub sub_folders: Vec<FolderNode>,
}

/// A flat, admin-facing description of one folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderSummary {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Slash-joined names from the root, e.g. `/Math/Week 1`.
    pub path: String,
    /// Depth level (0 for roots).
    pub depth: usize,
    /// Tags.
    pub tags: Vec<String>,
    /// Number of child folders.
    pub child_count: usize,
    /// Number of files directly in this folder.
    pub file_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
