//! Outbound mail delivery

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::MailError;
use crate::config::MailConfig;

/// A message ready to hand to a mail service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub subject: String,
    /// Submitter's address, used as Reply-To
    pub reply_to: String,
    pub body: String,
}

/// Delivers contact messages
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError>;
}

/// Stand-in used when SMTP credentials are missing
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredMailer;

#[async_trait]
impl Mailer for UnconfiguredMailer {
    async fn send(&self, _mail: OutboundMail) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// SMTP delivery through `lettre`
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailError> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err(MailError::NotConfigured);
        };

        let mailbox = |value: &str| {
            value
                .parse::<Mailbox>()
                .map_err(|e| MailError::Send(format!("invalid address {:?}: {}", value, e)))
        };
        let from = mailbox(config.from.as_deref().unwrap_or(username))?;
        let to = mailbox(config.recipient.as_deref().unwrap_or(username))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| MailError::Send(e.to_string()))?
            .credentials(Credentials::new(username.clone(), password.clone()));
        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    /// SMTP mailer for the config, or one that refuses to send
    pub fn from_config(config: &MailConfig) -> Box<dyn Mailer> {
        if !config.is_configured() {
            tracing::warn!("SMTP credentials are not set; contact messages cannot be delivered");
            return Box::new(UnconfiguredMailer);
        }
        match Self::new(config) {
            Ok(mailer) => Box::new(mailer),
            Err(e) => {
                tracing::error!("Invalid mail settings: {}", e);
                Box::new(UnconfiguredMailer)
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        let reply_to = mail
            .reply_to
            .parse::<Mailbox>()
            .map_err(|e| MailError::Invalid(format!("email: {}", e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(mail.subject)
            .body(mail.body)
            .map_err(|e| MailError::Send(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;
        Ok(())
    }
}
