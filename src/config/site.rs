//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required setting `{0}`")]
    Missing(&'static str),

    #[error("Setting `{key}` is not an absolute http(s) URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("Setting `{0}` must be greater than zero")]
    Zero(&'static str),
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,

    /// Public URL of the site, used for sitemap entries
    pub url: String,

    /// Static assets served as the router fallback
    pub public_dir: String,

    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Marketorix".to_string(),
            description: String::new(),
            url: "http://localhost:4000".to_string(),
            public_dir: "public".to_string(),
            content: ContentConfig::default(),
            mail: MailConfig::default(),
            recaptcha: RecaptchaConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SITE_URL") {
            self.url = v;
        }
        if let Some(v) = get("CONTENT_API_URL") {
            self.content.api_url = Some(v);
        }
        if let Some(v) = get("CONTENT_API_TOKEN") {
            self.content.api_token = Some(v);
        }
        if let Some(v) = get("SMTP_HOST") {
            self.mail.smtp_host = v;
        }
        if let Some(v) = get("SMTP_USERNAME") {
            self.mail.username = Some(v);
        }
        if let Some(v) = get("SMTP_PASSWORD") {
            self.mail.password = Some(v);
        }
        if let Some(v) = get("MAIL_RECIPIENT") {
            self.mail.recipient = Some(v);
        }
        if let Some(v) = get("RECAPTCHA_SECRET") {
            self.recaptcha.secret = Some(v);
        }
        if let Some(v) = get("RECAPTCHA_SITE_KEY") {
            self.recaptcha.site_key = Some(v);
        }
    }

    /// Validate the configuration and return the content API base URL.
    ///
    /// This is the only place settings are checked; consumers receive
    /// already-validated values.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        parse_http_url("url", &self.url)?;

        let api_url = self
            .content
            .api_url
            .as_deref()
            .ok_or(ConfigError::Missing("content.api_url"))?;
        let api_url = parse_http_url("content.api_url", api_url)?;

        if self.content.posts_per_page == 0 {
            return Err(ConfigError::Zero("content.posts_per_page"));
        }
        if self.content.sitemap_page_size == 0 {
            return Err(ConfigError::Zero("content.sitemap_page_size"));
        }

        Ok(api_url)
    }

    /// Site URL without a trailing slash
    pub fn site_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

fn parse_http_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(invalid()),
    }
}

/// Headless CMS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Base URL of the content API, e.g. `https://cms.example.com`
    pub api_url: Option<String>,
    /// Optional bearer token
    pub api_token: Option<String>,
    pub posts_per_page: u32,
    /// Page size of the single bulk fetch used by the sitemap
    pub sitemap_page_size: u32,
    /// Scalar post fields requested from the API
    pub fields: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            posts_per_page: 5,
            sitemap_page_size: 1000,
            fields: ["title", "excerpt", "slug", "createdAt", "updatedAt", "body"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Outbound SMTP settings for the contact relay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender address; falls back to `username`
    pub from: Option<String>,
    /// Inbox receiving contact messages; falls back to `username`
    pub recipient: Option<String>,
    pub subject_prefix: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: None,
            username: None,
            password: None,
            from: None,
            recipient: None,
            subject_prefix: "New message from".to_string(),
        }
    }
}

impl MailConfig {
    /// Whether enough is set to open an SMTP connection
    pub fn is_configured(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

/// reCAPTCHA verification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecaptchaConfig {
    /// Server-side secret; verification is disabled without it
    pub secret: Option<String>,
    /// Public key used by the contact page to request tokens
    pub site_key: Option<String>,
    pub verify_url: String,
    pub min_score: f64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret: None,
            site_key: None,
            verify_url: "https://www.google.com/recaptcha/api/siteverify".to_string(),
            min_score: 0.5,
        }
    }
}
