//! JWT claims carried by identity provider tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use studyhub_core::types::UserId;
use studyhub_entity::user::UserRole;

/// JWT claims payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the identity provider's user ID.
    pub sub: UserId,
    /// Verified email address.
    pub email: String,
    /// Role asserted by the identity provider. Defaults to `user`.
    #[serde(default)]
    pub role: UserRole,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> &UserId {
        &self.sub
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
