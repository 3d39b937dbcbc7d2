//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use studyhub_core::error::AppError;
use studyhub_core::types::FolderId;
use studyhub_entity::contact::ContactStatus;

/// Run `validator` rules, mapping failures to a `Validation` error.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}

/// Create folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderBody {
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

/// Rename/retag folder request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateFolderBody {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Move file request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileBody {
    pub source_folder_id: FolderId,
    pub destination_folder_id: FolderId,
}

/// Progress update body. Values above 100 are rejected by the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressBody {
    pub progress: u32,
}

/// `?q=` search query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// `?status=` filter for contact requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactListQuery {
    pub status: Option<ContactStatus>,
}

/// Contact request status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactStatusBody {
    pub status: ContactStatus,
}
