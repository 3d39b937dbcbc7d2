//! Contact request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use studyhub_core::error::AppError;
use studyhub_core::types::{ContactRequestId, UserId};

/// Handling state of a contact request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Pending,
    Resolved,
}

impl ContactStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            _ => Err(AppError::validation(format!(
                "Invalid contact status: '{s}'. Expected one of: pending, resolved"
            ))),
        }
    }
}

/// A message sent through the contact form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: ContactRequestId,
    /// The signed-in user who submitted the form.
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

impl ContactRequest {
    /// Build a new pending request. Fields are trimmed.
    pub fn new(user_id: UserId, name: &str, email: &str, message: &str) -> Self {
        Self {
            id: ContactRequestId::generate(),
            user_id,
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message: message.trim().to_string(),
            status: ContactStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
