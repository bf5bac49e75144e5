//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in query values (RFC 3986 unreserved)
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters left as-is in a path segment; matches `encodeURIComponent`
const PATH_SEGMENT: &AsciiSet = &QUERY_VALUE
    .remove(b'!')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*');

/// Join a base URL and a path with exactly one slash between them
///
/// # Examples
/// ```ignore
/// join_url("https://example.com/", "/blog") // -> "https://example.com/blog"
/// ```
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Whether a URL starts with an RFC 3986 scheme (`https:`, `data:`, `blob:`)
pub fn has_scheme(url: &str) -> bool {
    let Some(pos) = url.find(':') else {
        return false;
    };
    let mut chars = url[..pos].chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve a media URL against the content API base.
///
/// Absolute URLs are returned unchanged, so resolving twice is a no-op.
///
/// # Examples
/// ```ignore
/// resolve_media_url("https://cms.example.com", "/uploads/a.png")
/// // -> "https://cms.example.com/uploads/a.png"
/// ```
pub fn resolve_media_url(base: &str, url: &str) -> String {
    if has_scheme(url) || url.starts_with("//") {
        url.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/'))
    }
}

/// Percent-encode one path segment, e.g. a post slug
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

/// Percent-encode a query-string value
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cms.example.com";

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://example.com/", "/blog"), "https://example.com/blog");
        assert_eq!(join_url("https://example.com", "blog/a"), "https://example.com/blog/a");
        assert_eq!(join_url("https://example.com/", ""), "https://example.com");
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("https://x.com/a.png"));
        assert!(has_scheme("http://x.com"));
        assert!(!has_scheme("/uploads/a.png"));
        assert!(!has_scheme("uploads/a.png"));
        assert!(has_scheme("data:image/png;base64,AAAA"));
        assert!(has_scheme("blob:https://x.com/1f2e"));
        assert!(!has_scheme("/redirect?to=https://x.com"));
        assert!(!has_scheme("uploads/a:b.png"));
        assert!(!has_scheme(":nope"));
    }

    #[test]
    fn test_resolve_non_hierarchical_schemes_verbatim() {
        let data = "data:image/png;base64,AAAA";
        assert_eq!(resolve_media_url(BASE, data), data);
        let blob = "blob:https://cms.example.com/1f2e";
        assert_eq!(resolve_media_url(BASE, blob), blob);
    }

    #[test]
    fn test_resolve_absolute_is_verbatim() {
        let url = "https://cdn.example.net/a.png";
        assert_eq!(resolve_media_url(BASE, url), url);
    }

    #[test]
    fn test_resolve_relative_prefixes_once() {
        let once = resolve_media_url(BASE, "/uploads/a.png");
        assert_eq!(once, "https://cms.example.com/uploads/a.png");
        assert_eq!(resolve_media_url(BASE, &once), once);
        assert_eq!(
            resolve_media_url("https://cms.example.com/", "uploads/a.png"),
            "https://cms.example.com/uploads/a.png"
        );
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("my-post_1"), "my-post_1");
        assert_eq!(encode_path_segment("café & co/2"), "caf%C3%A9%20%26%20co%2F2");
        assert_eq!(encode_path_segment("it's(ok)*!"), "it's(ok)*!");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("createdAt:desc"), "createdAt%3Adesc");
        assert_eq!(encode_query_value("*"), "%2A");
        assert_eq!(encode_query_value("my-post_1.x~"), "my-post_1.x~");
        assert_eq!(encode_query_value("a b&c"), "a%20b%26c");
    }
}
