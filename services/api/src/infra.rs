use async_trait::async_trait;
use club_desk::config::{MailConfig, StoreConfig};
use club_desk::mail::SmtpMailer;
use club_desk::store::{LibSqlStore, RepositoryError};
use club_desk::workflows::registration::{ApplicantNotice, ApplicantNotifier, NotifyError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mail sender chosen at startup: a real relay, or a log line when SMTP is not configured.
pub(crate) enum OutboundMail {
    Smtp(SmtpMailer),
    Log,
}

impl OutboundMail {
    pub(crate) fn from_config(config: Option<&MailConfig>) -> Result<Self, NotifyError> {
        match config {
            Some(mail) => Ok(Self::Smtp(SmtpMailer::new(mail)?)),
            None => Ok(Self::Log),
        }
    }
}

#[async_trait]
impl ApplicantNotifier for OutboundMail {
    async fn notify(&self, notice: ApplicantNotice) -> Result<(), NotifyError> {
        match self {
            OutboundMail::Smtp(mailer) => mailer.notify(notice).await,
            OutboundMail::Log => {
                info!(
                    recipient = %notice.recipient,
                    subject = notice.subject(),
                    "SMTP not configured; mail not sent"
                );
                Ok(())
            }
        }
    }
}

pub(crate) async fn open_store(config: &StoreConfig) -> Result<LibSqlStore, RepositoryError> {
    match &config.database_path {
        Some(path) => LibSqlStore::open(path).await,
        None => LibSqlStore::in_memory().await,
    }
}
