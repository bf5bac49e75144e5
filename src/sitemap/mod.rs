//! Sitemap generation

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::content::ContentClient;
use crate::helpers::{encode_path_segment, escape_xml, join_url};

/// One `<url>` entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
}

/// Root, blog index, then one entry per post
pub async fn generate(site_url: &str, content: &ContentClient) -> Vec<SitemapEntry> {
    let now = Utc::now();
    let mut entries = vec![
        SitemapEntry {
            url: join_url(site_url, ""),
            last_modified: now,
        },
        SitemapEntry {
            url: join_url(site_url, "blog"),
            last_modified: now,
        },
    ];

    let posts = content.list_all_slugs_and_timestamps().await;
    tracing::debug!("Sitemap includes {} posts", posts.len());

    entries.extend(posts.into_iter().map(|post| SitemapEntry {
        url: join_url(site_url, &format!("blog/{}", encode_path_segment(&post.slug))),
        last_modified: post.updated_at,
    }));

    entries
}

/// Serialize entries as a sitemaps.org `urlset`
pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}
