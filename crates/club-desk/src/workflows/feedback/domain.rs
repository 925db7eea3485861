use serde::{Deserialize, Serialize};

use crate::workflows::lenient;

/// Store-assigned identifier of a feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

/// Body of `POST /submit-feedback`. Every field is optional on the wire, and
/// numbers or nulls are stored as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackSubmission {
    #[serde(deserialize_with = "lenient::texts")]
    pub ratings: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub coordinator_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub coordinator_rating: String,
    #[serde(deserialize_with = "lenient::text")]
    pub team_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
}

/// Persisted feedback. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    #[serde(rename = "_id")]
    pub id: FeedbackId,
    pub ratings: Vec<String>,
    pub coordinator_name: String,
    pub coordinator_rating: String,
    pub team_name: String,
    pub email: String,
}

impl FeedbackRecord {
    pub fn new(id: FeedbackId, submission: FeedbackSubmission) -> Self {
        let FeedbackSubmission {
            ratings,
            coordinator_name,
            coordinator_rating,
            team_name,
            email,
        } = submission;

        Self {
            id,
            ratings,
            coordinator_name,
            coordinator_rating,
            team_name,
            email,
        }
    }
}
