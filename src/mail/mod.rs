//! Contact form mail relay

mod captcha;
pub mod filter;
mod relay;
mod sender;

#[cfg(test)]
pub(crate) mod testing;

use axum::http::StatusCode;
use thiserror::Error;

pub use captcha::{CaptchaVerifier, DisabledVerifier, RecaptchaVerifier};
pub use relay::{ContactSubmission, MailRelay, RelayOutcome};
pub use sender::{Mailer, OutboundMail, SmtpMailer, UnconfiguredMailer};

/// Relay failures; client-caused ones map to 400, delivery ones to 500
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid submission: {0}")]
    Invalid(String),

    #[error("Submission rejected: disallowed content in `{field}`")]
    Rejected { field: &'static str },

    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Failed to send email: {0}")]
    Send(String),

    #[error("Mail delivery is not configured")]
    NotConfigured,
}

impl MailError {
    pub fn status(&self) -> StatusCode {
        match self {
            MailError::Invalid(_) | MailError::Rejected { .. } | MailError::Verification(_) => {
                StatusCode::BAD_REQUEST
            }
            MailError::Send(_) | MailError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
