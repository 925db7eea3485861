use async_trait::async_trait;

/// Which message an applicant receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Welcome,
    MeetingScheduled { date: String, time: String },
}

/// Outbound message to a single applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantNotice {
    pub recipient: String,
    pub name: String,
    pub kind: NoticeKind,
}

impl ApplicantNotice {
    pub fn welcome(name: &str, recipient: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            name: name.to_string(),
            kind: NoticeKind::Welcome,
        }
    }

    pub fn meeting(name: &str, recipient: &str, date: &str, time: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            name: name.to_string(),
            kind: NoticeKind::MeetingScheduled {
                date: date.to_string(),
                time: time.to_string(),
            },
        }
    }

    pub fn subject(&self) -> &'static str {
        match self.kind {
            NoticeKind::Welcome => "Welcome to the club!",
            NoticeKind::MeetingScheduled { .. } => "Your interview has been scheduled",
        }
    }

    pub fn body(&self) -> String {
        match &self.kind {
            NoticeKind::Welcome => format!(
                "Hello {},\n\nThank you for registering with the club. \
                 We will contact you soon about the next steps.",
                self.name
            ),
            NoticeKind::MeetingScheduled { date, time } => format!(
                "Hello {},\n\nYour meeting has been scheduled on {date} at {time}. \
                 Please be on time.",
                self.name
            ),
        }
    }
}

/// Outbound hook used by the registration workflow (SMTP in production).
#[async_trait]
pub trait ApplicantNotifier: Send + Sync {
    async fn notify(&self, notice: ApplicantNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("mail transport failed: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_body_mentions_slot() {
        let notice = ApplicantNotice::meeting("Ada", "ada@example.org", "2026-11-02", "14:00");
        let body = notice.body();
        assert!(body.contains("Hello Ada"));
        assert!(body.contains("2026-11-02 at 14:00"));
        assert_eq!(notice.subject(), "Your interview has been scheduled");
    }

    #[test]
    fn welcome_addresses_applicant() {
        let notice = ApplicantNotice::welcome("Lin", "lin@example.org");
        assert_eq!(notice.kind, NoticeKind::Welcome);
        assert!(notice.body().starts_with("Hello Lin"));
    }
}
