use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::domain::{
    Applicant, ApplicantId, Card, CardId, DeselectedApplicant, MeetingRequest, Registration,
};
use super::notifier::{ApplicantNotice, ApplicantNotifier, NotifyError};
use super::repository::{ApplicantRepository, CardRepository};
use crate::store::RepositoryError;

/// Registration and selection workflow over the applicant and card collections.
///
/// Store handles and the mail sender are injected so each can be swapped for
/// an in-memory double.
pub struct RegistrationService<R, C, N> {
    applicants: Arc<R>,
    cards: Arc<C>,
    notifier: Arc<N>,
}

impl<R, C, N> RegistrationService<R, C, N>
where
    R: ApplicantRepository + 'static,
    C: CardRepository + 'static,
    N: ApplicantNotifier + 'static,
{
    pub fn new(applicants: Arc<R>, cards: Arc<C>, notifier: Arc<N>) -> Self {
        Self {
            applicants,
            cards,
            notifier,
        }
    }

    /// Record a new applicant and send the welcome mail.
    ///
    /// The applicant stays registered when the mail fails; the error is still
    /// returned so the caller can report it.
    pub async fn register(
        &self,
        registration: Registration,
    ) -> Result<Applicant, RegistrationError> {
        let uid = registration.uid.clone();
        let applicant = Applicant::register(ApplicantId(Uuid::new_v4().to_string()), registration);

        let stored = match self.applicants.insert(applicant).await {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(RegistrationError::DuplicateUid(uid)),
            Err(other) => return Err(other.into()),
        };
        info!(applicant_id = %stored.id.0, uid = %stored.uid, "applicant registered");

        self.notifier
            .notify(ApplicantNotice::welcome(&stored.name, &stored.email))
            .await?;
        Ok(stored)
    }

    pub async fn applicants(&self) -> Result<Vec<Applicant>, RegistrationError> {
        Ok(self.applicants.list().await?)
    }

    pub async fn deselected(&self) -> Result<Vec<DeselectedApplicant>, RegistrationError> {
        Ok(self.applicants.deselected().await?)
    }

    pub async fn card_likes(&self, id: &CardId) -> Result<u64, RegistrationError> {
        self.cards
            .likes(id)
            .await?
            .ok_or_else(|| RegistrationError::CardNotFound(id.clone()))
    }

    pub async fn like_card(&self, id: &CardId) -> Result<u64, RegistrationError> {
        self.cards
            .increment_likes(id)
            .await?
            .ok_or_else(|| RegistrationError::CardNotFound(id.clone()))
    }

    /// Store the meeting slot, then mail it to the applicant.
    pub async fn schedule_meeting(
        &self,
        request: MeetingRequest,
    ) -> Result<Applicant, RegistrationError> {
        let MeetingRequest {
            user_id,
            date,
            time,
        } = request;

        let mut applicant = self.require_applicant(&user_id).await?;
        applicant.schedule(date, time);
        self.persist(applicant.clone()).await?;

        info!(
            applicant_id = %applicant.id.0,
            date = applicant.meeting_date.as_deref().unwrap_or_default(),
            time = applicant.meeting_time.as_deref().unwrap_or_default(),
            "meeting scheduled"
        );

        let notice = ApplicantNotice::meeting(
            &applicant.name,
            &applicant.email,
            applicant.meeting_date.as_deref().unwrap_or_default(),
            applicant.meeting_time.as_deref().unwrap_or_default(),
        );
        self.notifier.notify(notice).await?;
        Ok(applicant)
    }

    /// Mark an applicant as selected. A falsy flag is rejected rather than
    /// treated as an unselect.
    pub async fn select(
        &self,
        id: &ApplicantId,
        selected: bool,
    ) -> Result<Applicant, RegistrationError> {
        if !selected {
            return Err(RegistrationError::SelectionNotRequested);
        }

        let mut applicant = self.require_applicant(id).await?;
        applicant.selected = true;
        self.persist(applicant.clone()).await?;

        info!(applicant_id = %id.0, "applicant selected");
        Ok(applicant)
    }

    /// Archive the applicant with `reason` and remove it from the active pool.
    pub async fn deselect(
        &self,
        id: &ApplicantId,
        reason: String,
    ) -> Result<DeselectedApplicant, RegistrationError> {
        let archived = self
            .applicants
            .archive(id, &reason, Utc::now())
            .await?
            .ok_or_else(|| RegistrationError::ApplicantNotFound(id.clone()))?;

        info!(applicant_id = %id.0, reason = %archived.reason, "applicant deselected");
        Ok(archived)
    }

    /// Insert or replace cards, returning how many were written.
    pub async fn seed_cards(&self, cards: Vec<Card>) -> Result<usize, RegistrationError> {
        let total = cards.len();
        for card in cards {
            self.cards.upsert(card).await?;
        }
        info!(cards = total, "card catalog seeded");
        Ok(total)
    }

    async fn require_applicant(&self, id: &ApplicantId) -> Result<Applicant, RegistrationError> {
        self.applicants
            .fetch(id)
            .await?
            .ok_or_else(|| RegistrationError::ApplicantNotFound(id.clone()))
    }

    async fn persist(&self, applicant: Applicant) -> Result<(), RegistrationError> {
        let id = applicant.id.clone();
        match self.applicants.update(applicant).await {
            Ok(()) => Ok(()),
            Err(RepositoryError::NotFound) => {
                warn!(applicant_id = %id.0, "applicant vanished before update");
                Err(RegistrationError::ApplicantNotFound(id))
            }
            Err(other) => Err(other.into()),
        }
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("UID already registered")]
    DuplicateUid(String),
    #[error("applicant {0} not found")]
    ApplicantNotFound(ApplicantId),
    #[error("card {0} not found")]
    CardNotFound(CardId),
    #[error("selection flag must be true")]
    SelectionNotRequested,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
