//! Video embed URLs

use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Extract a YouTube video id from a watch, short or live URL
///
/// # Examples
/// ```ignore
/// youtube_video_id("https://www.youtube.com/watch?v=abc123") // -> Some("abc123")
/// youtube_video_id("https://youtu.be/abc123")                // -> Some("abc123")
/// youtube_video_id("https://youtube.com/live/abc123")        // -> Some("abc123")
/// ```
pub fn youtube_video_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;

    let id = match url.host_str()? {
        "www.youtube.com" | "youtube.com" | "m.youtube.com" => {
            match url.path().strip_prefix("/live/") {
                Some(rest) => rest.split('/').next().map(str::to_string),
                None => url
                    .query_pairs()
                    .find(|(k, _)| k == "v")
                    .map(|(_, v)| v.into_owned()),
            }
        }
        "youtu.be" => url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string),
        _ => None,
    }?;

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then_some(id)
}

/// Embeddable player URL for a known video host
pub fn embed_url(raw: &str) -> Option<String> {
    youtube_video_id(raw).map(|id| format!("{}{}", EMBED_BASE, id))
}
