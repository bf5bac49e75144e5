//! Contact form relay

use serde::Deserialize;
use serde_json::Value;

use super::filter::{is_denied, is_email, strip_line_breaks};
use super::{CaptchaVerifier, MailError, Mailer, OutboundMail};

/// A contact form submission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    /// Hidden field; real users leave it empty
    #[serde(default)]
    pub honeypot: Value,
    #[serde(default)]
    pub recaptcha_token: Option<String>,
}

impl ContactSubmission {
    fn honeypot_tripped(&self) -> bool {
        match &self.honeypot {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}

/// How an accepted submission was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Sent,
    /// Honeypot filled: reported as success, nothing sent
    Trapped,
}

/// Validates submissions and forwards them to the mailer
pub struct MailRelay {
    verifier: Box<dyn CaptchaVerifier>,
    mailer: Box<dyn Mailer>,
    subject_prefix: String,
}

impl MailRelay {
    pub fn new(
        verifier: Box<dyn CaptchaVerifier>,
        mailer: Box<dyn Mailer>,
        subject_prefix: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            mailer,
            subject_prefix: subject_prefix.into(),
        }
    }

    pub async fn submit(&self, submission: ContactSubmission) -> Result<RelayOutcome, MailError> {
        if submission.honeypot_tripped() {
            tracing::info!("Honeypot filled, dropping contact submission");
            return Ok(RelayOutcome::Trapped);
        }

        let name = strip_line_breaks(submission.name.trim());
        let email = strip_line_breaks(submission.email.trim());
        let message = submission.message.trim().to_string();

        for (field, value) in [("name", &name), ("email", &email), ("message", &message)] {
            if value.is_empty() {
                return Err(MailError::Invalid(format!("{} is required", field)));
            }
        }
        if !is_email(&email) {
            return Err(MailError::Invalid("email is not a valid address".to_string()));
        }

        self.verifier
            .verify(submission.recaptcha_token.as_deref())
            .await?;

        for (field, value) in [("name", &name), ("email", &email), ("message", &message)] {
            if is_denied(value) {
                return Err(MailError::Rejected { field });
            }
        }

        self.mailer
            .send(OutboundMail {
                subject: format!("{} {}", self.subject_prefix, name),
                reply_to: email,
                body: message,
            })
            .await?;

        tracing::info!("Contact message from {:?} relayed", name);
        Ok(RelayOutcome::Sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::testing::{RecordingMailer, StaticVerifier};
    use serde_json::json;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "We need a new landing page.".to_string(),
            ..ContactSubmission::default()
        }
    }

    fn relay(verifier: StaticVerifier, mailer: &RecordingMailer) -> MailRelay {
        MailRelay::new(Box::new(verifier), Box::new(mailer.clone()), "New message from")
    }

    #[tokio::test]
    async fn test_sends_valid_submission() {
        let mailer = RecordingMailer::default();
        let outcome = relay(StaticVerifier::accept(), &mailer)
            .submit(submission())
            .await
            .unwrap();

        assert_eq!(outcome, RelayOutcome::Sent);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New message from Ada");
        assert_eq!(sent[0].reply_to, "ada@example.com");
    }

    #[tokio::test]
    async fn test_honeypot_skips_everything() {
        let mailer = RecordingMailer::default();
        let verifier = StaticVerifier::reject();
        let calls = verifier.calls.clone();
        let mut sub = submission();
        sub.honeypot = json!("http://spam.example");

        let outcome = relay(verifier, &mailer).submit(sub).await.unwrap();
        assert_eq!(outcome, RelayOutcome::Trapped);
        assert_eq!(mailer.calls(), 0);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falsy_honeypot_is_ignored() {
        for honeypot in [json!(null), json!(""), json!(false), json!(0)] {
            let mailer = RecordingMailer::default();
            let mut sub = submission();
            sub.honeypot = honeypot;
            let outcome = relay(StaticVerifier::accept(), &mailer).submit(sub).await.unwrap();
            assert_eq!(outcome, RelayOutcome::Sent);
        }
    }

    #[tokio::test]
    async fn test_sql_in_message_is_rejected() {
        let mailer = RecordingMailer::default();
        let mut sub = submission();
        sub.message = "SELECT * FROM users; --".to_string();

        let err = relay(StaticVerifier::accept(), &mailer).submit(sub).await.unwrap_err();
        assert!(matches!(err, MailError::Rejected { field: "message" }));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(mailer.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_verification_is_client_error() {
        let mailer = RecordingMailer::default();
        let err = relay(StaticVerifier::reject(), &mailer)
            .submit(submission())
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::Verification(_)));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(mailer.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let mailer = RecordingMailer::default();
        let mut sub = submission();
        sub.email = "   ".to_string();
        let err = relay(StaticVerifier::accept(), &mailer).submit(sub).await.unwrap_err();
        assert!(matches!(err, MailError::Invalid(_)));

        let mut sub = submission();
        sub.email = "not-an-address".to_string();
        let err = relay(StaticVerifier::accept(), &mailer).submit(sub).await.unwrap_err();
        assert!(matches!(err, MailError::Invalid(_)));
    }

    #[tokio::test]
    async fn test_header_fields_lose_line_breaks() {
        let mailer = RecordingMailer::default();
        let mut sub = submission();
        sub.name = "Ada\r\nBcc: victim@example.com".to_string();
        relay(StaticVerifier::accept(), &mailer).submit(sub).await.unwrap();
        assert_eq!(mailer.sent()[0].subject, "New message from AdaBcc: victim@example.com");
    }

    #[tokio::test]
    async fn test_send_failure_is_server_error() {
        let mailer = RecordingMailer::failing();
        let err = relay(StaticVerifier::accept(), &mailer)
            .submit(submission())
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let sub: ContactSubmission = serde_json::from_value(json!({
            "name": "A", "email": "a@b.co", "message": "m", "recaptchaToken": "t", "honeypot": ""
        }))
        .unwrap();
        assert_eq!(sub.recaptcha_token.as_deref(), Some("t"));
        assert!(!sub.honeypot_tripped());
    }
}
