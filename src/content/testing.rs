//! Test doubles for the content API

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;
use url::Url;

use super::{ContentError, ContentTransport};

type Responder = Box<dyn Fn(&Url) -> Result<Value, ContentError> + Send + Sync>;

/// Transport answering from a closure and recording request URLs
pub struct FakeTransport {
    respond: Responder,
    requests: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&Url) -> Result<Value, ContentError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same body
    pub fn fixed(body: Value) -> Self {
        Self::new(move |_| Ok(body.clone()))
    }

    /// Always answers with a 502
    pub fn failing() -> Self {
        Self::new(|url| {
            Err(ContentError::Status {
                url: url.to_string(),
                status: 502,
            })
        })
    }

    /// Serves `total` posts (`post-1` newest) honouring the requested
    /// page, page size and slug filter
    pub fn paged(total: u32) -> Self {
        Self::new(move |url| {
            let param = |key: &str| {
                url.query_pairs()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
            };

            if let Some(slug) = param("filters[slug][$eq]") {
                let items: Vec<_> = (1..=total)
                    .filter(|i| format!("post-{}", i) == slug)
                    .map(|i| post_item(i, &slug))
                    .collect();
                let count = items.len() as u32;
                return Ok(page_body(items, 1, 25, count.min(1), count));
            }

            let page: u32 = param("pagination[page]")
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            let size: u32 = param("pagination[pageSize]")
                .and_then(|v| v.parse().ok())
                .unwrap_or(25);
            let first = (page - 1) * size + 1;
            let last = (page * size).min(total);
            let items: Vec<_> = (first..=last)
                .map(|i| post_item(i, &format!("post-{}", i)))
                .collect();

            Ok(page_body(items, page, size, total.div_ceil(size), total))
        })
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentTransport for FakeTransport {
    async fn get_json(&self, url: &Url) -> Result<Value, ContentError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        (self.respond)(url)
    }
}

/// A wrapped (`attributes`) entry
pub fn post_item(id: u32, slug: &str) -> Value {
    json!({
        "id": id,
        "attributes": {
            "title": format!("Post {}", id),
            "excerpt": format!("Excerpt {}", id),
            "slug": slug,
            "createdAt": "2026-01-01T00:00:00.000Z",
            "updatedAt": "2026-02-01T00:00:00.000Z",
            "content_blocks": []
        }
    })
}

/// A collection response body
pub fn page_body(items: Vec<Value>, page: u32, page_size: u32, page_count: u32, total: u32) -> Value {
    json!({
        "data": items,
        "meta": {
            "pagination": {
                "page": page,
                "pageSize": page_size,
                "pageCount": page_count,
                "total": total
            }
        }
    })
}
