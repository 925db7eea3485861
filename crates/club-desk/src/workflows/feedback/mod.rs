//! Feedback intake: one endpoint that stores rating submissions as-is.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;


pub use domain::{FeedbackId, FeedbackRecord, FeedbackSubmission};
pub use repository::FeedbackRepository;
pub use router::feedback_router;
pub use service::{FeedbackError, FeedbackService};
