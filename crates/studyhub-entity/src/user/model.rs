//! User profile and uploader identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use studyhub_core::types::UserId;

use super::role::UserRole;

/// A user profile, created from the identity provider's claims on first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Identity provider user id.
    pub id: UserId,
    /// Email address from the identity provider.
    pub email: String,
    /// Optional display username, editable by admins.
    pub username: Option<String>,
    /// Role.
    pub role: UserRole,
    /// When the profile was first seen.
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name shown in listings: the username if set, otherwise the email.
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(&self.email)
    }

    /// Case-insensitive substring match on email or username.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.email.to_lowercase().contains(&query)
            || self
                .username
                .as_ref()
                .is_some_and(|u| u.to_lowercase().contains(&query))
    }
}

/// Identity of the user who uploaded a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uploader {
    /// Uploader's user id.
    pub id: UserId,
    /// Uploader's email.
    pub email: String,
}
