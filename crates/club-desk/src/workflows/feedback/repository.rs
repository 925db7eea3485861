use async_trait::async_trait;

use super::domain::FeedbackRecord;
use crate::store::RepositoryError;

/// Append-only storage for feedback submissions.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn insert(&self, record: FeedbackRecord) -> Result<FeedbackRecord, RepositoryError>;
}
