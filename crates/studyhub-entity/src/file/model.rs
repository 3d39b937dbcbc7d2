//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyhub_core::error::AppError;
use studyhub_core::types::{FileId, FolderId};

use crate::user::Uploader;

/// A study-materials file owned by exactly one folder.
///
/// Serialized in the camelCase shape of the nested folder document, with
/// the MIME type under `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Unique file identifier.
    pub id: FileId,
    /// The folder that owns this file.
    #[serde(default)]
    pub folder_id: FolderId,
    /// File name, unique within the owning folder.
    pub name: String,
    /// Public URL of the blob.
    pub url: String,
    /// MIME type string.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Object path within blob storage.
    #[serde(default)]
    pub storage_path: String,
    /// Blob size in bytes.
    #[serde(default)]
    pub size_bytes: i64,
    /// Who uploaded the file.
    #[serde(default)]
    pub uploaded_by: Option<Uploader>,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    /// Returns a copy of this record re-homed under another folder, with its
    /// new blob path and URL.
    pub fn relocated(&self, folder_id: FolderId, storage_path: String, url: String) -> Self {
        Self {
            folder_id,
            storage_path,
            url,
            ..self.clone()
        }
    }
}

/// Blob storage path for a file named `file_name` in `folder_id`.
pub fn blob_path(folder_id: &FolderId, file_name: &str) -> String {
    format!("global/folders/{folder_id}/{file_name}")
}

/// Validates a file name for use as the last segment of a blob path.
pub fn validate_file_name(name: &str) -> Result<(), AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("File name cannot be empty"));
    }
    if trimmed.len() > 255 {
        return Err(AppError::validation("File name exceeds 255 characters"));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(AppError::validation(format!(
            "File name '{trimmed}' contains a path separator or is reserved"
        )));
    }
    Ok(())
}
