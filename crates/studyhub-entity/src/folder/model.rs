//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyhub_core::error::AppError;
use studyhub_core::types::{FolderId, UserId};

/// A folder in the study-materials hierarchy.
///
/// The record carries an explicit parent reference; child order and owned
/// files live in [`FolderTree`](super::FolderTree).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Free-text tags, deduplicated.
    pub tags: Vec<String>,
    /// Parent folder ID (`None` for root folders).
    pub parent_id: Option<FolderId>,
    /// The user who created the folder.
    pub created_by: Option<UserId>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Build a new folder with a freshly minted id.
    pub fn new(
        name: impl Into<String>,
        tags: Vec<String>,
        parent_id: Option<FolderId>,
        created_by: Option<UserId>,
    ) -> Self {
        Self {
            id: FolderId::generate(),
            name: name.into().trim().to_string(),
            tags: normalize_tags(tags),
            parent_id,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Case-insensitive substring match on the name or any tag.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

/// Trims tags, drops empty ones and removes duplicates, keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Validates a folder name.
pub fn validate_folder_name(name: &str) -> Result<(), AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("Folder name cannot be empty"));
    }
    if trimmed.chars().count() > 255 {
        return Err(AppError::validation("Folder name exceeds 255 characters"));
    }
    Ok(())
}

/// Validates a folder id for use as a blob path segment.
pub fn validate_folder_id(id: &FolderId) -> Result<(), AppError> {
    let id = id.as_str();
    if id.trim().is_empty() {
        return Err(AppError::validation("Folder id cannot be empty"));
    }
    if id == "." || id == ".." || id.contains('/') || id.contains('\\') {
        return Err(AppError::validation(format!(
            "Folder id '{id}' contains a path separator or is reserved"
        )));
    }
    Ok(())
}
