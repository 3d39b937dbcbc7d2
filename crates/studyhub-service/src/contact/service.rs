use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use studyhub_core::error::AppError;
use studyhub_core::types::ContactRequestId;
use studyhub_database::repositories::ContactRepository;
use studyhub_entity::contact::{ContactRequest, ContactStatus};

use crate::context::RequestContext;

/// Accepts contact form submissions and lets admins triage them.
#[derive(Debug, Clone)]
pub struct ContactService {
    repo: Arc<ContactRepository>,
}

/// A contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitContactRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

impl SubmitContactRequest {
    fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

impl ContactService {
    /// Creates a new contact service.
    pub fn new(repo: Arc<ContactRepository>) -> Self {
        Self { repo }
    }

    /// Stores a submission as `pending`.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        req: SubmitContactRequest,
    ) -> Result<ContactRequest, AppError> {
        let req = req.trimmed();
        req.validate()
            .map_err(|e| AppError::validation(format!("Invalid contact request: {e}")))?;

        let request = ContactRequest::new(ctx.user_id.clone(), &req.name, &req.email, &req.message);
        self.repo.insert(&request).await?;
        info!(user_id = %ctx.user_id, request_id = %request.id, "Contact request submitted");
        Ok(request)
    }

    /// Lists submissions, newest first. Admin only.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<ContactStatus>,
    ) -> Result<Vec<ContactRequest>, AppError> {
        ctx.require_admin()?;
        self.repo.list(status).await
    }

    /// Marks a submission pending or resolved. Admin only.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: &ContactRequestId,
        status: ContactStatus,
    ) -> Result<ContactRequest, AppError> {
        ctx.require_admin()?;
        let request = self.repo.set_status(id, status).await?;
        info!(admin_id = %ctx.user_id, request_id = %id, status = %status, "Contact request updated");
        Ok(request)
    }

    /// Number of submissions awaiting a response.
    pub async fn count_pending(&self) -> Result<i64, AppError> {
        self.repo.count_pending().await
    }
}
