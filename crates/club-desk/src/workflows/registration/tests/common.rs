use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::store::RepositoryError;
use crate::workflows::registration::domain::{
    Applicant, ApplicantId, Card, CardId, DeselectedApplicant, Registration,
};
use crate::workflows::registration::notifier::{ApplicantNotice, ApplicantNotifier, NotifyError};
use crate::workflows::registration::repository::{ApplicantRepository, CardRepository};
use crate::workflows::registration::RegistrationService;

pub(super) type MemoryService = RegistrationService<MemoryApplicants, MemoryCards, MemoryMailbox>;

pub(super) fn registration(uid: &str) -> Registration {
    Registration {
        name: "Ada Lovelace".to_string(),
        uid: uid.to_string(),
        department: "Computer Science".to_string(),
        occupation: "Student".to_string(),
        email: format!("{uid}@example.org"),
        schedule_meeting: false,
        selected: false,
    }
}

pub(super) fn card(id: &str, likes: u64) -> Card {
    Card {
        id: CardId(id.to_string()),
        title: "Robotics".to_string(),
        content: "Build and race robots".to_string(),
        image: "/img/robotics.png".to_string(),
        alt: "robot arm".to_string(),
        likes,
    }
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryApplicants>,
    Arc<MemoryCards>,
    Arc<MemoryMailbox>,
) {
    let applicants = Arc::new(MemoryApplicants::default());
    let cards = Arc::new(MemoryCards::default());
    let mailbox = Arc::new(MemoryMailbox::default());
    let service = RegistrationService::new(applicants.clone(), cards.clone(), mailbox.clone());
    (service, applicants, cards, mailbox)
}

#[derive(Default)]
pub(super) struct MemoryApplicants {
    active: Mutex<Vec<Applicant>>,
    archived: Mutex<Vec<DeselectedApplicant>>,
}

impl MemoryApplicants {
    pub(super) fn active(&self) -> Vec<Applicant> {
        self.active.lock().expect("applicant mutex poisoned").clone()
    }

    pub(super) fn archived(&self) -> Vec<DeselectedApplicant> {
        self.archived.lock().expect("archive mutex poisoned").clone()
    }
}

#[async_trait]
impl ApplicantRepository for MemoryApplicants {
    async fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        let mut guard = self.active.lock().expect("applicant mutex poisoned");
        if guard.iter().any(|existing| existing.uid == applicant.uid) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(applicant.clone());
        Ok(applicant)
    }

    async fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.active.lock().expect("applicant mutex poisoned");
        Ok(guard.iter().find(|applicant| &applicant.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self.active())
    }

    async fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut guard = self.active.lock().expect("applicant mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == applicant.id) {
            Some(slot) => {
                *slot = applicant;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn archive(
        &self,
        id: &ApplicantId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<DeselectedApplicant>, RepositoryError> {
        let mut active = self.active.lock().expect("applicant mutex poisoned");
        let Some(position) = active.iter().position(|applicant| &applicant.id == id) else {
            return Ok(None);
        };
        let applicant = active.remove(position);
        let archived = DeselectedApplicant::archive(applicant, reason.to_string(), at);
        self.archived
            .lock()
            .expect("archive mutex poisoned")
            .push(archived.clone());
        Ok(Some(archived))
    }

    async fn deselected(&self) -> Result<Vec<DeselectedApplicant>, RepositoryError> {
        Ok(self.archived())
    }
}

#[derive(Default)]
pub(super) struct MemoryCards {
    cards: Mutex<HashMap<CardId, Card>>,
}

impl MemoryCards {
    pub(super) fn with(cards: Vec<Card>) -> Self {
        let map = cards.into_iter().map(|card| (card.id.clone(), card)).collect();
        Self {
            cards: Mutex::new(map),
        }
    }

    pub(super) fn get(&self, id: &str) -> Option<Card> {
        self.cards
            .lock()
            .expect("card mutex poisoned")
            .get(&CardId(id.to_string()))
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.cards.lock().expect("card mutex poisoned").len()
    }
}

#[async_trait]
impl CardRepository for MemoryCards {
    async fn likes(&self, id: &CardId) -> Result<Option<u64>, RepositoryError> {
        let guard = self.cards.lock().expect("card mutex poisoned");
        Ok(guard.get(id).map(|card| card.likes))
    }

    async fn increment_likes(&self, id: &CardId) -> Result<Option<u64>, RepositoryError> {
        let mut guard = self.cards.lock().expect("card mutex poisoned");
        Ok(guard.get_mut(id).map(|card| {
            card.likes += 1;
            card.likes
        }))
    }

    async fn upsert(&self, card: Card) -> Result<(), RepositoryError> {
        self.cards
            .lock()
            .expect("card mutex poisoned")
            .insert(card.id.clone(), card);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryMailbox {
    sent: Mutex<Vec<ApplicantNotice>>,
}

impl MemoryMailbox {
    pub(super) fn sent(&self) -> Vec<ApplicantNotice> {
        self.sent.lock().expect("mailbox mutex poisoned").clone()
    }
}

#[async_trait]
impl ApplicantNotifier for MemoryMailbox {
    async fn notify(&self, notice: ApplicantNotice) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("mailbox mutex poisoned")
            .push(notice);
        Ok(())
    }
}

pub(super) struct FailingMailbox;

#[async_trait]
impl ApplicantNotifier for FailingMailbox {
    async fn notify(&self, _notice: ApplicantNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("relay refused connection".to_string()))
    }
}

pub(super) struct OfflineStore;

#[async_trait]
impl ApplicantRepository for OfflineStore {
    async fn insert(&self, _applicant: Applicant) -> Result<Applicant, RepositoryError> {
        Err(offline())
    }

    async fn fetch(&self, _id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Err(offline())
    }

    async fn list(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Err(offline())
    }

    async fn update(&self, _applicant: Applicant) -> Result<(), RepositoryError> {
        Err(offline())
    }

    async fn archive(
        &self,
        _id: &ApplicantId,
        _reason: &str,
        _at: DateTime<Utc>,
    ) -> Result<Option<DeselectedApplicant>, RepositoryError> {
        Err(offline())
    }

    async fn deselected(&self) -> Result<Vec<DeselectedApplicant>, RepositoryError> {
        Err(offline())
    }
}

#[async_trait]
impl CardRepository for OfflineStore {
    async fn likes(&self, _id: &CardId) -> Result<Option<u64>, RepositoryError> {
        Err(offline())
    }

    async fn increment_likes(&self, _id: &CardId) -> Result<Option<u64>, RepositoryError> {
        Err(offline())
    }

    async fn upsert(&self, _card: Card) -> Result<(), RepositoryError> {
        Err(offline())
    }
}

fn offline() -> RepositoryError {
    RepositoryError::Unavailable("database offline".to_string())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
