//! Post and pagination models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A blog post, normalized from the content API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Upstream identifier, opaque to this crate
    pub id: String,

    pub title: String,

    pub excerpt: String,

    /// Routing key (`/blog/<slug>`)
    pub slug: String,

    /// Markdown body rendered above the content blocks
    pub body: String,

    pub featured_image_url: Option<String>,

    pub featured_image_alt: Option<String>,

    /// Blocks in upstream order
    pub content_blocks: Vec<ContentBlock>,

    pub meta_title: Option<String>,

    pub meta_description: Option<String>,

    pub created_at: Option<DateTime<Utc>>,

    /// Falls back to the fetch time when upstream omits it
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Title for the `<title>` element
    pub fn page_title(&self) -> &str {
        self.meta_title.as_deref().unwrap_or(&self.title)
    }

    /// Description for the meta description tag
    pub fn page_description(&self) -> &str {
        self.meta_description.as_deref().unwrap_or(&self.excerpt)
    }
}

/// Pagination record reported by the content API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u32,
}

impl Pagination {
    /// The uniform "empty or failed" record
    pub fn zeroed() -> Self {
        Self {
            page: 1,
            page_size: 10,
            page_count: 0,
            total: 0,
        }
    }

    /// Whether pages exist beyond this one
    pub fn has_more(&self) -> bool {
        self.page < self.page_count
    }
}

/// One page of posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedPosts {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

impl PaginatedPosts {
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            pagination: Pagination::zeroed(),
        }
    }
}

/// Minimal projection used by the sitemap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugTimestamp {
    pub slug: String,
    pub updated_at: DateTime<Utc>,
}

/// A resolved media reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Absolute URL
    pub url: String,
    pub alt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A content block: the upstream discriminator plus its typed payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Upstream discriminator, e.g. `content-blocks.video-embed`
    pub component: String,
    pub kind: BlockKind,
}

impl ContentBlock {
    /// First image attached to an image-bearing block
    pub fn first_image(&self) -> Option<&MediaAsset> {
        match &self.kind {
            BlockKind::Image { images } => images.first(),
            _ => None,
        }
    }
}

/// Block payload variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BlockKind {
    /// Structured rich text, passed through unchanged
    RichText { content: Value },
    /// Body block, same rendering path as rich text
    Body { body: Value },
    Image { images: Vec<MediaAsset> },
    VideoEmbed { url: String, title: Option<String> },
    /// Unrecognized discriminator, raw payload kept
    Unknown { raw: Value },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_pagination() {
        let p = Pagination::zeroed();
        assert_eq!((p.page, p.page_size, p.page_count, p.total), (1, 10, 0, 0));
        assert!(!p.has_more());
    }

    #[test]
    fn test_has_more() {
        let p = Pagination {
            page: 2,
            page_size: 5,
            page_count: 3,
            total: 15,
        };
        assert!(p.has_more());
        assert!(!Pagination { page: 3, ..p }.has_more());
    }

    #[test]
    fn test_pagination_serializes_camel_case() {
        let json = serde_json::to_value(Pagination::zeroed()).unwrap();
        assert_eq!(json["pageSize"], 10);
        assert_eq!(json["pageCount"], 0);
    }
}
