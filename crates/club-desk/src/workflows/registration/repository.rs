use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{Applicant, ApplicantId, Card, CardId, DeselectedApplicant};
use crate::store::RepositoryError;

/// Storage for active and deselected applicants.
#[async_trait]
pub trait ApplicantRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the `uid` is taken.
    async fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError>;
    async fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Applicant>, RepositoryError>;
    async fn update(&self, applicant: Applicant) -> Result<(), RepositoryError>;
    /// Move an applicant into the deselected collection as one atomic step.
    /// Returns `None` when no active applicant has `id`.
    async fn archive(
        &self,
        id: &ApplicantId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<DeselectedApplicant>, RepositoryError>;
    async fn deselected(&self) -> Result<Vec<DeselectedApplicant>, RepositoryError>;
}

/// Storage for display cards and their like counters.
#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn likes(&self, id: &CardId) -> Result<Option<u64>, RepositoryError>;
    /// Atomically add one like, returning the new total, or `None` for unknown cards.
    async fn increment_likes(&self, id: &CardId) -> Result<Option<u64>, RepositoryError>;
    async fn upsert(&self, card: Card) -> Result<(), RepositoryError>;
}
