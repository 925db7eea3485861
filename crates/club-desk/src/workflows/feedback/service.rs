use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::domain::{FeedbackId, FeedbackRecord, FeedbackSubmission};
use super::repository::FeedbackRepository;
use crate::store::RepositoryError;

/// Accepts feedback submissions and hands them to the repository.
pub struct FeedbackService<R> {
    repository: Arc<R>,
}

impl<R> FeedbackService<R>
where
    R: FeedbackRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Persist a submission without inspecting its fields.
    pub async fn submit(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<FeedbackRecord, FeedbackError> {
        let id = FeedbackId(Uuid::new_v4().to_string());
        let record = FeedbackRecord::new(id, submission);
        let stored = self.repository.insert(record).await?;

        info!(
            feedback_id = %stored.id.0,
            team = %stored.team_name,
            ratings = stored.ratings.len(),
            "feedback stored"
        );
        Ok(stored)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
