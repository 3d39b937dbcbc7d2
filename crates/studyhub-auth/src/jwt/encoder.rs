//! Token minting for development and tests.
//!
//! Production tokens come from the identity provider; this encoder signs
//! tokens with the same shared secret so a local setup can be exercised
//! without one.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use studyhub_core::config::AuthConfig;
use studyhub_core::error::AppError;
use studyhub_core::types::UserId;
use studyhub_entity::user::UserRole;

use super::claims::Claims;

/// Creates signed HS256 tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder").finish_non_exhaustive()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        }
    }

    /// Signs arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Mints a token for a user that expires after `ttl_minutes`.
    pub fn mint(
        &self,
        user_id: &UserId,
        email: &str,
        role: UserRole,
        ttl_minutes: i64,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.clone(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        };
        self.encode(&claims)
    }
}
