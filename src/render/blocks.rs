//! Content block rendering

use super::{rich_text, video};
use crate::content::{BlockKind, ContentBlock, MarkdownRenderer, Post};
use crate::helpers::{html_escape, image_tag};

/// Maps content blocks to HTML. Stateless apart from the shared
/// markdown/highlighting tables.
pub struct BlockRenderer {
    markdown: MarkdownRenderer,
}

impl BlockRenderer {
    pub fn new(markdown: MarkdownRenderer) -> Self {
        Self { markdown }
    }

    /// Markdown body followed by every content block
    pub fn render_post(&self, post: &Post) -> String {
        let mut html = String::new();
        if !post.body.trim().is_empty() {
            html.push_str(r#"<div class="post-body">"#);
            html.push_str(&self.markdown.render(&post.body));
            html.push_str("</div>\n");
        }
        html.push_str(&self.render_blocks(&post.content_blocks));
        html
    }

    /// Render blocks in order
    pub fn render_blocks(&self, blocks: &[ContentBlock]) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block))
            .filter(|html| !html.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render one block; never fails
    pub fn render_block(&self, block: &ContentBlock) -> String {
        match &block.kind {
            BlockKind::RichText { content } => self.rich_text(content),
            BlockKind::Body { body } => self.rich_text(body),
            BlockKind::Image { images } => match images.first() {
                Some(image) => format!(
                    r#"<div class="block block-image">{}</div>"#,
                    image_tag(
                        &image.url,
                        image.alt.as_deref().unwrap_or("Image"),
                        image.width,
                        image.height
                    )
                ),
                None => String::new(),
            },
            BlockKind::VideoEmbed { url, title } => render_video(url, title.as_deref()),
            BlockKind::Unknown { .. } => {
                tracing::warn!("Unhandled block type: {:?}", block.component);
                format!(
                    r#"<p class="block unhandled-block">Unhandled block type: {}</p>"#,
                    html_escape(&block.component)
                )
            }
        }
    }

    fn rich_text(&self, payload: &serde_json::Value) -> String {
        format!(
            r#"<div class="block block-rich-text">{}</div>"#,
            rich_text::render(payload, &self.markdown)
        )
    }
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self::new(MarkdownRenderer::new())
    }
}

fn render_video(url: &str, title: Option<&str>) -> String {
    if url.trim().is_empty() {
        return String::new();
    }

    match video::embed_url(url) {
        Some(embed) => format!(
            r#"<div class="block block-video"><iframe width="560" height="315" src="{}" title="{}" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div>"#,
            html_escape(&embed),
            html_escape(title.unwrap_or("YouTube video player"))
        ),
        None => format!(
            r#"<div class="block block-video"><video controls width="560" height="315"><source src="{}">Your browser does not support the video tag.</video></div>"#,
            html_escape(url)
        ),
    }
}
