//! Content API client

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use super::adapter::{self, Normalizer};
use super::query::{self, Query};
use super::{ContentError, PaginatedPosts, Pagination, Post, SlugTimestamp};
use crate::config::{ConfigError, SiteConfig};

/// Issues GET requests and decodes JSON bodies
#[async_trait]
pub trait ContentTransport: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<Value, ContentError>;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
        }
    }
}

#[async_trait]
impl ContentTransport for HttpTransport {
    async fn get_json(&self, url: &Url) -> Result<Value, ContentError> {
        let mut request = self.client.get(url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|source| ContentError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ContentError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|e| ContentError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Fetches and normalizes posts.
///
/// The public operations never fail: transport errors, non-2xx responses
/// and malformed bodies are logged and reported as empty values.
#[derive(Clone)]
pub struct ContentClient {
    base_url: String,
    normalizer: Normalizer,
    fields: Vec<String>,
    sitemap_page_size: u32,
    transport: Arc<dyn ContentTransport>,
}

impl ContentClient {
    /// Create a client for an already-validated base URL
    pub fn new(base_url: &Url, transport: Arc<dyn ContentTransport>) -> Self {
        let base_url = base_url.as_str().trim_end_matches('/').to_string();
        let defaults = crate::config::ContentConfig::default();
        Self {
            normalizer: Normalizer::new(&base_url),
            base_url,
            fields: defaults.fields,
            sitemap_page_size: defaults.sitemap_page_size,
            transport,
        }
    }

    /// Validate the config and build an HTTP-backed client
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let base_url = config.validate()?;
        let transport = HttpTransport::new(config.content.api_token.clone());
        Ok(Self::new(&base_url, Arc::new(transport))
            .with_fields(config.content.fields.clone())
            .with_sitemap_page_size(config.content.sitemap_page_size))
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_sitemap_page_size(mut self, page_size: u32) -> Self {
        self.sitemap_page_size = page_size.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One page of posts, newest first.
    ///
    /// Returns the zeroed pagination record on any failure.
    pub async fn list_posts(&self, page: u32, page_size: u32) -> PaginatedPosts {
        let page = page.max(1);
        let page_size = page_size.max(1);

        match self.try_list_posts(page, page_size).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Failed to fetch posts (page {}): {}", page, e);
                PaginatedPosts::empty()
            }
        }
    }

    /// Post with exactly this slug; `None` when missing or on failure
    pub async fn get_post_by_slug(&self, slug: &str) -> Option<Post> {
        match self.try_get_post_by_slug(slug).await {
            Ok(Some(post)) => Some(post),
            Ok(None) => {
                tracing::debug!("No post with slug {:?}", slug);
                None
            }
            Err(e) => {
                tracing::error!("Failed to fetch post {:?}: {}", slug, e);
                None
            }
        }
    }

    /// Every post's slug and last update, in one request
    pub async fn list_all_slugs_and_timestamps(&self) -> Vec<SlugTimestamp> {
        match self.try_list_all_slugs().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!("Failed to fetch sitemap entries: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_list_posts(&self, page: u32, page_size: u32) -> Result<PaginatedPosts, ContentError> {
        let body = self
            .fetch(&query::list_posts(page, page_size, self.fields.as_slice()))
            .await?;

        let mut posts = self.normalizer.posts(&body, Utc::now())?;
        if posts.len() > page_size as usize {
            tracing::warn!(
                "Content API returned {} posts for page size {}, truncating",
                posts.len(),
                page_size
            );
            posts.truncate(page_size as usize);
        }

        let pagination = adapter::pagination(&body).unwrap_or(Pagination {
            page,
            page_size,
            page_count: 0,
            total: 0,
        });

        Ok(PaginatedPosts { posts, pagination })
    }

    async fn try_get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let body = self
            .fetch(&query::post_by_slug(slug, self.fields.as_slice()))
            .await?;

        let entries = self.normalizer.entries(&body)?;
        if entries.len() > 1 {
            tracing::debug!("{} posts share slug {:?}, using the first", entries.len(), slug);
        }

        entries
            .first()
            .map(|item| self.normalizer.post(item, Utc::now()))
            .transpose()
    }

    async fn try_list_all_slugs(&self) -> Result<Vec<SlugTimestamp>, ContentError> {
        let body = self.fetch(&query::sitemap(self.sitemap_page_size)).await?;
        let posts = self.normalizer.posts(&body, Utc::now())?;

        if let Some(p) = adapter::pagination(&body) {
            if p.page_count > 1 {
                tracing::warn!(
                    "Sitemap covers {} of {} posts; raise content.sitemap_page_size",
                    posts.len(),
                    p.total
                );
            }
        }

        Ok(posts
            .into_iter()
            .filter(|post| !post.slug.is_empty())
            .map(|post| SlugTimestamp {
                slug: post.slug,
                updated_at: post.updated_at,
            })
            .collect())
    }

    async fn fetch(&self, query: &Query) -> Result<Value, ContentError> {
        let url = Url::parse(&format!("{}/api/posts?{}", self.base_url, query.encode()))?;
        tracing::debug!("GET {}", url);
        self.transport.get_json(&url).await
    }
}
