use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::workflows::lenient;

/// Store-assigned identifier of an applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicantId(pub String);

/// Identifier of a display card.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /api/register`. Flags accept `"false"`, `0` or null as false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Registration {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub uid: String,
    #[serde(deserialize_with = "lenient::text")]
    pub department: String,
    #[serde(deserialize_with = "lenient::text")]
    pub occupation: String,
    #[serde(deserialize_with = "lenient::text")]
    pub email: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub schedule_meeting: bool,
    #[serde(deserialize_with = "lenient::flag")]
    pub selected: bool,
}

/// An active applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    #[serde(rename = "_id")]
    pub id: ApplicantId,
    pub name: String,
    pub uid: String,
    pub department: String,
    pub occupation: String,
    pub email: String,
    pub schedule_meeting: bool,
    pub selected: bool,
    pub meeting_date: Option<String>,
    pub meeting_time: Option<String>,
}

impl Applicant {
    pub fn register(id: ApplicantId, registration: Registration) -> Self {
        let Registration {
            name,
            uid,
            department,
            occupation,
            email,
            schedule_meeting,
            selected,
        } = registration;

        Self {
            id,
            name,
            uid,
            department,
            occupation,
            email,
            schedule_meeting,
            selected,
            meeting_date: None,
            meeting_time: None,
        }
    }

    pub fn schedule(&mut self, date: String, time: String) {
        self.schedule_meeting = true;
        self.meeting_date = Some(date);
        self.meeting_time = Some(time);
    }
}

/// Archived snapshot of an applicant removed from the active pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeselectedApplicant {
    pub user_id: ApplicantId,
    pub name: String,
    pub uid: String,
    pub department: String,
    pub occupation: String,
    pub email: String,
    pub schedule_meeting: bool,
    pub selected: bool,
    pub meeting_date: Option<String>,
    pub meeting_time: Option<String>,
    pub reason: String,
    pub deselected_at: DateTime<Utc>,
}

impl DeselectedApplicant {
    pub fn archive(applicant: Applicant, reason: String, deselected_at: DateTime<Utc>) -> Self {
        Self {
            user_id: applicant.id,
            name: applicant.name,
            uid: applicant.uid,
            department: applicant.department,
            occupation: applicant.occupation,
            email: applicant.email,
            schedule_meeting: applicant.schedule_meeting,
            selected: applicant.selected,
            meeting_date: applicant.meeting_date,
            meeting_time: applicant.meeting_time,
            reason,
            deselected_at,
        }
    }

    /// The applicant as it looked right before deselection.
    pub fn snapshot(&self) -> Applicant {
        Applicant {
            id: self.user_id.clone(),
            name: self.name.clone(),
            uid: self.uid.clone(),
            department: self.department.clone(),
            occupation: self.occupation.clone(),
            email: self.email.clone(),
            schedule_meeting: self.schedule_meeting,
            selected: self.selected,
            meeting_date: self.meeting_date.clone(),
            meeting_time: self.meeting_time.clone(),
        }
    }
}

/// Display card with a like counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub content: String,
    pub image: String,
    pub alt: String,
    #[serde(default)]
    pub likes: u64,
}

/// Body of `POST /api/schedule-meeting`. A missing `userId` resolves to no
/// applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingRequest {
    #[serde(deserialize_with = "applicant_ref")]
    pub user_id: ApplicantId,
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(deserialize_with = "lenient::text")]
    pub time: String,
}

fn applicant_ref<'de, D>(deserializer: D) -> Result<ApplicantId, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient::text(deserializer).map(ApplicantId)
}

/// Body of `PATCH /api/select-user/:id`. The flag is read with loose truthiness
/// so `"yes"` or `1` select just like `true`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub selected: Value,
}

impl SelectionRequest {
    pub fn is_selected(&self) -> bool {
        lenient::truthy(&self.selected)
    }
}

/// Body of `POST /api/deselect-user/:userId`. The body itself may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeselectionRequest {
    #[serde(default, deserialize_with = "lenient::text")]
    pub reason: String,
}
