//! Query strings for the content API
//!
//! Keys use the bracketed `qs` notation and are emitted verbatim; only
//! values are percent-encoded.

use crate::helpers::encode_query_value;

/// Ordered list of query parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single `key=value` pair
    pub fn push(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append an indexed list: `key[0]=a&key[1]=b`
    pub fn list<S: AsRef<str>>(mut self, key: &str, values: &[S]) -> Self {
        for (i, value) in values.iter().enumerate() {
            self.pairs
                .push((format!("{}[{}]", key, i), value.as_ref().to_string()));
        }
        self
    }

    /// Value of the first pair with this key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `k=v&k=v`
    pub fn encode(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, encode_query_value(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Populate the featured image and the polymorphic block relation
    fn with_population(self) -> Self {
        self.list(
            "populate[main_image][fields]",
            &["url", "alternativeText", "width", "height"],
        )
        .push("populate[content_blocks][populate]", "*")
    }
}

/// Newest-first page of posts
pub fn list_posts<S: AsRef<str>>(page: u32, page_size: u32, fields: &[S]) -> Query {
    Query::new()
        .list("sort", &["createdAt:desc"])
        .push("pagination[page]", page)
        .push("pagination[pageSize]", page_size)
        .with_population()
        .list("fields", fields)
}

/// Exact, case-sensitive slug match
pub fn post_by_slug<S: AsRef<str>>(slug: &str, fields: &[S]) -> Query {
    Query::new()
        .push("filters[slug][$eq]", slug)
        .with_population()
        .list("fields", fields)
}

/// Single bulk fetch of slugs and timestamps
pub fn sitemap(page_size: u32) -> Query {
    Query::new()
        .list("fields", &["slug", "updatedAt"])
        .list("sort", &["updatedAt:desc"])
        .push("pagination[page]", 1)
        .push("pagination[pageSize]", page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_encoding() {
        let q = Query::new().list("fields", &["title", "slug"]);
        assert_eq!(q.encode(), "fields[0]=title&fields[1]=slug");
    }

    #[test]
    fn test_list_posts_query() {
        let q = list_posts(2, 5, &["title"]);
        let encoded = q.encode();
        assert!(encoded.starts_with("sort[0]=createdAt%3Adesc&pagination[page]=2&pagination[pageSize]=5"));
        assert!(encoded.contains("populate[main_image][fields][0]=url"));
        assert!(encoded.contains("populate[content_blocks][populate]=%2A"));
        assert!(encoded.ends_with("fields[0]=title"));
    }

    #[test]
    fn test_slug_query_encodes_value_only() {
        let q = post_by_slug("hello world&x", &["slug"]);
        assert_eq!(q.get("filters[slug][$eq]"), Some("hello world&x"));
        assert!(q.encode().starts_with("filters[slug][$eq]=hello%20world%26x&"));
    }

    #[test]
    fn test_sitemap_query() {
        let q = sitemap(1000);
        assert_eq!(q.get("pagination[pageSize]"), Some("1000"));
        assert_eq!(q.get("fields[1]"), Some("updatedAt"));
    }
}
