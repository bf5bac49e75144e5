//! Ingestion adapter for content API responses.
//!
//! The API has served two entry shapes over time: flat entries
//! (`{ id, title, .. }`) and wrapped entries (`{ id, attributes: { title, .. } }`).
//! Media relations likewise come as `{ data: { attributes } }`, `{ data: [..] }`
//! or plain objects. Everything is flattened here, once, into the canonical
//! [`Post`] shape; nothing downstream branches on the wire format.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::{BlockKind, ContentBlock, ContentError, MediaAsset, Pagination, Post};
use crate::helpers::resolve_media_url;

pub const UNTITLED: &str = "Untitled Post";

pub const RICH_TEXT_BLOCK: &str = "content.rich-text-block";
pub const BODY_BLOCK: &str = "content-blocks.body";
pub const IMAGE_BLOCK: &str = "content-blocks.image-block";
pub const MEDIA_BLOCK: &str = "content.media";
pub const VIDEO_BLOCK: &str = "content-blocks.video-embed";

/// Converts raw API payloads into canonical posts
#[derive(Debug, Clone)]
pub struct Normalizer {
    media_base: String,
}

impl Normalizer {
    /// `media_base` is prefixed to every relative media URL
    pub fn new(media_base: &str) -> Self {
        Self {
            media_base: media_base.trim_end_matches('/').to_string(),
        }
    }

    /// The `data` array of a collection response
    pub fn entries<'a>(&self, body: &'a Value) -> Result<&'a [Value], ContentError> {
        match body.get("data") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(ContentError::Shape(format!(
                "`data` is {} instead of an array",
                type_name(other)
            ))),
            None => Err(ContentError::Shape("missing `data`".to_string())),
        }
    }

    /// Normalize every entry of a collection response
    pub fn posts(&self, body: &Value, now: DateTime<Utc>) -> Result<Vec<Post>, ContentError> {
        self.entries(body)?
            .iter()
            .map(|item| self.post(item, now))
            .collect()
    }

    /// Normalize a single entry
    pub fn post(&self, item: &Value, now: DateTime<Utc>) -> Result<Post, ContentError> {
        let entry = flatten_entry(item)?;

        let content_blocks = entry
            .get("content_blocks")
            .or_else(|| entry.get("contentBlocks"))
            .map(|v| self.blocks(v))
            .unwrap_or_default();

        let main_image = entry
            .get("main_image")
            .or_else(|| entry.get("mainImage"))
            .and_then(|v| self.media(v).into_iter().next());

        // Dedicated field first, then the first image-bearing block
        let featured = main_image.or_else(|| {
            content_blocks
                .iter()
                .find_map(|block| block.first_image().cloned())
        });
        let (featured_image_url, featured_image_alt) = match featured {
            Some(asset) => (Some(asset.url), asset.alt),
            None => (None, None),
        };

        Ok(Post {
            id: entry.get("id").map(id_string).unwrap_or_default(),
            title: text(&entry, &["title"]).unwrap_or_else(|| UNTITLED.to_string()),
            excerpt: text(&entry, &["excerpt"]).unwrap_or_default(),
            slug: text(&entry, &["slug"]).unwrap_or_default(),
            body: text(&entry, &["body"]).unwrap_or_default(),
            featured_image_url,
            featured_image_alt,
            content_blocks,
            meta_title: text(&entry, &["meta_title", "metaTitle"]),
            meta_description: text(&entry, &["meta_description", "metaDescription"]),
            created_at: timestamp(&entry, &["createdAt", "created_at"]),
            updated_at: timestamp(&entry, &["updatedAt", "updated_at"]).unwrap_or(now),
        })
    }

    /// Content blocks in upstream order
    pub fn blocks(&self, value: &Value) -> Vec<ContentBlock> {
        let Value::Array(items) = value else {
            return Vec::new();
        };
        items.iter().map(|item| self.block(item)).collect()
    }

    fn block(&self, item: &Value) -> ContentBlock {
        let component = item
            .get("__component")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let kind = match component.as_str() {
            RICH_TEXT_BLOCK => BlockKind::RichText {
                content: self.rich_text(item.get("content")),
            },
            BODY_BLOCK => BlockKind::Body {
                body: self.rich_text(item.get("body")),
            },
            IMAGE_BLOCK | MEDIA_BLOCK => BlockKind::Image {
                images: item.get("image").map(|v| self.media(v)).unwrap_or_default(),
            },
            VIDEO_BLOCK => BlockKind::VideoEmbed {
                url: item
                    .get("video_url")
                    .or_else(|| item.get("url"))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                title: item
                    .get("title")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            },
            _ => BlockKind::Unknown { raw: item.clone() },
        };

        ContentBlock { component, kind }
    }

    /// Every media asset referenced by a relation value, in order
    pub fn media(&self, value: &Value) -> Vec<MediaAsset> {
        let mut out = Vec::new();
        self.collect_media(value, &mut out);
        out
    }

    fn collect_media(&self, value: &Value, out: &mut Vec<MediaAsset>) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.collect_media(item, out);
                }
            }
            Value::Object(map) => {
                if let Some(data) = map.get("data") {
                    self.collect_media(data, out);
                } else if let Some(Value::Object(attributes)) = map.get("attributes") {
                    out.extend(self.asset(attributes));
                } else {
                    out.extend(self.asset(map));
                }
            }
            _ => {}
        }
    }

    fn asset(&self, map: &Map<String, Value>) -> Option<MediaAsset> {
        let url = map.get("url").and_then(Value::as_str)?;
        if url.is_empty() {
            return None;
        }
        Some(MediaAsset {
            url: resolve_media_url(&self.media_base, url),
            alt: text(map, &["alternativeText", "alt"]),
            width: dimension(map.get("width")),
            height: dimension(map.get("height")),
        })
    }

    /// Rich-text payload with embedded image URLs resolved
    fn rich_text(&self, value: Option<&Value>) -> Value {
        let mut value = value.cloned().unwrap_or(Value::Null);
        self.resolve_embedded_images(&mut value);
        value
    }

    fn resolve_embedded_images(&self, value: &mut Value) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.resolve_embedded_images(item);
                }
            }
            Value::Object(map) => {
                if map.get("type").and_then(Value::as_str) == Some("image") {
                    if let Some(Value::String(url)) =
                        map.get_mut("image").and_then(|image| image.get_mut("url"))
                    {
                        let resolved = resolve_media_url(&self.media_base, url);
                        *url = resolved;
                    }
                }
                if let Some(children) = map.get_mut("children") {
                    self.resolve_embedded_images(children);
                }
            }
            _ => {}
        }
    }
}

/// Pagination record from `meta.pagination`, when present and well-formed
pub fn pagination(body: &Value) -> Option<Pagination> {
    let raw = body.get("meta")?.get("pagination")?;
    serde_json::from_value(raw.clone()).ok()
}

/// Merge a wrapped entry's `attributes` with its `id`
fn flatten_entry(item: &Value) -> Result<Map<String, Value>, ContentError> {
    let Value::Object(map) = item else {
        return Err(ContentError::Shape(format!(
            "entry is {} instead of an object",
            type_name(item)
        )));
    };

    match map.get("attributes") {
        Some(Value::Object(attributes)) => {
            let mut flat = attributes.clone();
            if let Some(id) = map.get("id") {
                flat.insert("id".to_string(), id.clone());
            }
            Ok(flat)
        }
        _ => Ok(map.clone()),
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First non-empty string among `keys`
fn text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn timestamp(map: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    let raw = text(map, keys)?;
    match DateTime::parse_from_rfc3339(&raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Ignoring unparseable timestamp {:?}: {}", raw, e);
            None
        }
    }
}

fn dimension(value: Option<&Value>) -> Option<u32> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
