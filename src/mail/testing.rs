//! Test doubles for the mail relay

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{CaptchaVerifier, MailError, Mailer, OutboundMail};

/// Verifier with a fixed answer, counting calls
#[derive(Debug, Clone)]
pub struct StaticVerifier {
    accept: bool,
    pub calls: Arc<AtomicUsize>,
}

impl StaticVerifier {
    pub fn accept() -> Self {
        Self {
            accept: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn reject() -> Self {
        Self {
            accept: false,
            ..Self::accept()
        }
    }
}

#[async_trait]
impl CaptchaVerifier for StaticVerifier {
    async fn verify(&self, _token: Option<&str>) -> Result<(), MailError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.accept {
            Ok(())
        } else {
            Err(MailError::Verification("rejected by test verifier".to_string()))
        }
    }
}

/// Mailer recording every message; clones share the record
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    fail: bool,
    sent: Arc<Mutex<Vec<OutboundMail>>>,
    calls: Arc<AtomicUsize>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<OutboundMail> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), MailError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MailError::Send("smtp down".to_string()));
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }
        Ok(())
    }
}
