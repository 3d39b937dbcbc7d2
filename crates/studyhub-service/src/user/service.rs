use std::sync::Arc;

use tracing::debug;

use studyhub_auth::Claims;
use studyhub_core::error::AppError;
use studyhub_core::types::UserId;
use studyhub_database::repositories::UserRepository;
use studyhub_entity::user::UserProfile;

use crate::context::RequestContext;

/// Keeps the local profile table in step with the identity provider.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// Upsert the profile for a verified token and build the request
    /// context from it.
    ///
    /// The token's role only seeds a new profile. After that the stored
    /// role is authoritative, so an admin demotion sticks even while the
    /// user's token still claims `admin`. A profile an admin deleted is not
    /// re-created; its tokens get `Authorization`.
    pub async fn ensure_profile(&self, claims: &Claims) -> Result<RequestContext, AppError> {
        let profile = self
            .user_repo
            .upsert(claims.user_id(), &claims.email, claims.role)
            .await?;
        debug!(user_id = %profile.id, role = %profile.role, "Profile resolved");
        Ok(RequestContext::new(profile.id, profile.email, profile.role))
    }

    /// Look up a profile.
    pub async fn get_profile(&self, user_id: &UserId) -> Result<UserProfile, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{user_id}' not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use studyhub_database::DatabasePool;
    use studyhub_entity::user::UserRole;

    fn claims(role: UserRole) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: UserId::new("u1"),
            email: "u1@example.com".to_string(),
            role,
            iat: now,
            exp: now + 60,
        }
    }

    #[tokio::test]
    async fn test_stored_role_wins_after_creation() {
        let db = DatabasePool::in_memory().await.expect("db");
        let repo = Arc::new(UserRepository::new(db.into_pool()));
        let svc = UserService::new(repo.clone());

        let ctx = svc.ensure_profile(&claims(UserRole::Admin)).await.unwrap();
        assert!(ctx.is_admin());

        repo.update(&ctx.user_id, None, Some(UserRole::User)).await.unwrap();
        let ctx = svc.ensure_profile(&claims(UserRole::Admin)).await.unwrap();
        assert!(!ctx.is_admin());
        assert_eq!(svc.get_profile(&ctx.user_id).await.unwrap().email, "u1@example.com");
    }

    #[tokio::test]
    async fn test_deleted_user_admin_token_is_refused() {
        let db = DatabasePool::in_memory().await.expect("db");
        let repo = Arc::new(UserRepository::new(db.pool().clone()));
        let svc = UserService::new(repo.clone());
        let ctx = svc.ensure_profile(&claims(UserRole::User)).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        repo.delete(&mut tx, &ctx.user_id).await.unwrap();
        tx.commit().await.unwrap();

        let err = svc.ensure_profile(&claims(UserRole::Admin)).await.unwrap_err();
        assert_eq!(err.kind, studyhub_core::error::ErrorKind::Authorization);
        assert!(svc.get_profile(&ctx.user_id).await.unwrap_err().is_not_found());
    }
}
