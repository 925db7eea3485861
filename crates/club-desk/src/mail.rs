//! SMTP delivery for applicant notices, built on lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::MailConfig;
use crate::workflows::registration::{ApplicantNotice, ApplicantNotifier, NotifyError};

/// Sends applicant notices through an authenticated SMTP relay.
///
/// The transport is built once at startup and shared by every request.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let credentials = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = SmtpTransport::relay(&config.smtp_host)
            .map_err(|err| NotifyError::Transport(format!("SMTP relay error: {err}")))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox(&config.from_address)?,
        })
    }

    fn build_message(&self, notice: &ApplicantNotice) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&notice.recipient)?)
            .subject(notice.subject())
            .body(notice.body())
            .map_err(|err| NotifyError::Transport(format!("failed to build email: {err}")))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}

#[async_trait]
impl ApplicantNotifier for SmtpMailer {
    async fn notify(&self, notice: ApplicantNotice) -> Result<(), NotifyError> {
        let message = self.build_message(&notice)?;
        let transport = self.transport.clone();

        // lettre's SmtpTransport blocks on the network.
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|err| NotifyError::Transport(format!("mail task failed: {err}")))?
            .map_err(|err| NotifyError::Transport(format!("SMTP send failed: {err}")))?;

        info!(recipient = %notice.recipient, subject = notice.subject(), "mail sent");
        Ok(())
    }
}
