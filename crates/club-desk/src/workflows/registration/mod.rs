//! Applicant registration, interview scheduling and selection decisions, plus
//! the like counters on the club's display cards.

pub mod catalog;
pub mod domain;
pub mod notifier;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CardCatalog, CardCatalogError};
pub use domain::{
    Applicant, ApplicantId, Card, CardId, DeselectedApplicant, DeselectionRequest,
    MeetingRequest, Registration, SelectionRequest,
};
pub use notifier::{ApplicantNotice, ApplicantNotifier, NoticeKind, NotifyError};
pub use repository::{ApplicantRepository, CardRepository};
pub use router::registration_router;
pub use service::{RegistrationError, RegistrationService};
