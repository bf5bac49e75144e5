//! Anti-automation token verification

use async_trait::async_trait;
use serde::Deserialize;

use super::MailError;
use crate::config::RecaptchaConfig;

/// Verifies a client-supplied anti-automation token
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: Option<&str>) -> Result<(), MailError>;
}

/// Accepts every submission; used when no secret is configured
#[derive(Debug, Clone, Default)]
pub struct DisabledVerifier;

#[async_trait]
impl CaptchaVerifier for DisabledVerifier {
    async fn verify(&self, _token: Option<&str>) -> Result<(), MailError> {
        Ok(())
    }
}

/// Google reCAPTCHA `siteverify` client
#[derive(Debug, Clone)]
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    secret: String,
    verify_url: String,
    min_score: f64,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    score: Option<f64>,
    #[serde(rename = "error-codes", default)]
    error_codes: Vec<String>,
}

impl RecaptchaVerifier {
    pub fn new(secret: String, verify_url: String, min_score: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret,
            verify_url,
            min_score,
        }
    }

    /// Verifier for the config, or a disabled one when no secret is set
    pub fn from_config(config: &RecaptchaConfig) -> Box<dyn CaptchaVerifier> {
        match &config.secret {
            Some(secret) => Box::new(Self::new(
                secret.clone(),
                config.verify_url.clone(),
                config.min_score,
            )),
            None => {
                tracing::warn!("recaptcha.secret is not set; contact form verification is disabled");
                Box::new(DisabledVerifier)
            }
        }
    }

    fn check(&self, response: VerifyResponse) -> Result<(), MailError> {
        if !response.success {
            return Err(MailError::Verification(format!(
                "token rejected ({})",
                response.error_codes.join(", ")
            )));
        }
        match response.score {
            Some(score) if score < self.min_score => Err(MailError::Verification(format!(
                "score {} below {}",
                score, self.min_score
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, token: Option<&str>) -> Result<(), MailError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| MailError::Verification("missing token".to_string()))?;

        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| MailError::Verification(format!("verifier unreachable: {}", e)))?;

        let body: VerifyResponse = response
            .json()
            .await
            .map_err(|e| MailError::Verification(format!("bad verifier response: {}", e)))?;

        self.check(body)
    }
}
