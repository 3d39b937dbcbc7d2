//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studyhub_core::error::AppError;
use studyhub_core::types::UserId;
use studyhub_entity::user::{Uploader, UserRole};

/// Context for the current authenticated request.
///
/// Built from the verified token and the stored profile, then passed into
/// service methods so that every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Email address from the identity token.
    pub email: String,
    /// The user's stored role.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fail with `Authorization` unless the current user is an admin.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::authorization("Admin role required"))
        }
    }

    /// Uploader identity recorded on files this user stores.
    pub fn uploader(&self) -> Uploader {
        Uploader {
            id: self.user_id.clone(),
            email: self.email.clone(),
        }
    }
}
