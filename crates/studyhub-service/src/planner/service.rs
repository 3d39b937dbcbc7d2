use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use studyhub_core::error::AppError;
use studyhub_database::repositories::UserDataRepository;
use studyhub_entity::planner::{Dashboard, PlannerSection, UserData};

use crate::context::RequestContext;

/// Reads and edits the caller's planner document.
#[derive(Debug, Clone)]
pub struct PlannerService {
    repo: Arc<UserDataRepository>,
}

/// A new planner entry.
///
/// `when` is a free-form time for tasks and a date for every other section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddEntryRequest {
    pub name: String,
    #[serde(alias = "time", alias = "date")]
    pub when: String,
}

impl PlannerService {
    /// Creates a new planner service.
    pub fn new(repo: Arc<UserDataRepository>) -> Self {
        Self { repo }
    }

    /// The caller's document, created empty on first access.
    pub async fn get_user_data(&self, ctx: &RequestContext) -> Result<UserData, AppError> {
        let mut tx = self.repo.begin().await?;
        let data = match self.repo.find(&mut tx, &ctx.user_id).await? {
            Some(data) => data,
            None => {
                let data = UserData::default();
                self.repo.save(&mut tx, &ctx.user_id, &data).await?;
                debug!(user_id = %ctx.user_id, "Planner document initialized");
                data
            }
        };
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit planner read: {e}")))?;
        Ok(data)
    }

    /// Appends an entry to `section`.
    pub async fn add_entry(
        &self,
        ctx: &RequestContext,
        section: PlannerSection,
        req: AddEntryRequest,
    ) -> Result<UserData, AppError> {
        let data = self
            .modify(ctx, |data| data.add(section, &req.name, &req.when).map(|_| ()))
            .await?;
        info!(user_id = %ctx.user_id, section = %section, "Planner entry added");
        Ok(data)
    }

    /// Removes the entry at `index` in `section`.
    pub async fn delete_entry(
        &self,
        ctx: &RequestContext,
        section: PlannerSection,
        index: usize,
    ) -> Result<UserData, AppError> {
        let data = self.modify(ctx, |data| data.remove(section, index)).await?;
        info!(user_id = %ctx.user_id, section = %section, index, "Planner entry deleted");
        Ok(data)
    }

    /// Sets the completion percentage of a task or assignment.
    pub async fn set_progress(
        &self,
        ctx: &RequestContext,
        section: PlannerSection,
        index: usize,
        progress: u8,
    ) -> Result<UserData, AppError> {
        let data = self
            .modify(ctx, |data| data.set_progress(section, index, progress))
            .await?;
        info!(
            user_id = %ctx.user_id,
            section = %section,
            index,
            progress,
            "Planner progress updated"
        );
        Ok(data)
    }

    /// Counts, average progress, and upcoming items as of `today`.
    pub async fn dashboard(
        &self,
        ctx: &RequestContext,
        today: NaiveDate,
    ) -> Result<Dashboard, AppError> {
        Ok(self.get_user_data(ctx).await?.dashboard(today))
    }

    async fn modify<F>(&self, ctx: &RequestContext, edit: F) -> Result<UserData, AppError>
    where
        F: FnOnce(&mut UserData) -> Result<(), AppError>,
    {
        let mut tx = self.repo.begin().await?;
        let mut data = self
            .repo
            .find(&mut tx, &ctx.user_id)
            .await?
            .unwrap_or_default();
        edit(&mut data)?;
        self.repo.save(&mut tx, &ctx.user_id, &data).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit planner update: {e}")))?;
        Ok(data)
    }
}
