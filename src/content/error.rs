//! Content API errors

use thiserror::Error;

/// Failures while talking to or decoding the content API.
///
/// These never escape the public `ContentClient` operations; they are
/// logged and degraded to empty values there.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Content API returned {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
