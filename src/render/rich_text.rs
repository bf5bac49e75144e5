//! Structured rich text (CMS "blocks" JSON) to HTML

use serde_json::{Map, Value};

use crate::content::MarkdownRenderer;
use crate::helpers::{has_scheme, html_escape, image_tag};

/// Render a rich-text payload.
///
/// Arrays are node lists, strings are treated as markdown, anything else
/// renders nothing.
pub fn render(value: &Value, markdown: &MarkdownRenderer) -> String {
    match value {
        Value::String(source) => markdown.render(source),
        Value::Array(nodes) => render_nodes(nodes, markdown),
        Value::Object(node) => render_node(node, markdown),
        _ => String::new(),
    }
}

fn render_nodes(nodes: &[Value], markdown: &MarkdownRenderer) -> String {
    nodes
        .iter()
        .filter_map(Value::as_object)
        .map(|node| render_node(node, markdown))
        .collect()
}

fn render_node(node: &Map<String, Value>, markdown: &MarkdownRenderer) -> String {
    let children = || match node.get("children") {
        Some(Value::Array(children)) => render_nodes(children, markdown),
        _ => String::new(),
    };

    match node.get("type").and_then(Value::as_str).unwrap_or_default() {
        "text" => render_text(node),
        "paragraph" => format!("<p>{}</p>", children()),
        "heading" => {
            let level = node
                .get("level")
                .and_then(Value::as_u64)
                .unwrap_or(2)
                .clamp(1, 6);
            format!("<h{0}>{1}</h{0}>", level, children())
        }
        "list" => {
            let tag = match node.get("format").and_then(Value::as_str) {
                Some("ordered") => "ol",
                _ => "ul",
            };
            format!("<{0}>{1}</{0}>", tag, children())
        }
        "list-item" => format!("<li>{}</li>", children()),
        "quote" => format!("<blockquote>{}</blockquote>", children()),
        "code" => {
            let code = plain_text(node);
            let lang = node.get("language").and_then(Value::as_str);
            markdown.highlight_code(&code, lang)
        }
        "image" => match node.get("image").and_then(Value::as_object) {
            Some(image) => {
                let src = image.get("url").and_then(Value::as_str).unwrap_or_default();
                if src.is_empty() {
                    return String::new();
                }
                let alt = image
                    .get("alternativeText")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let dim = |key: &str| {
                    image
                        .get(key)
                        .and_then(Value::as_u64)
                        .and_then(|n| u32::try_from(n).ok())
                };
                image_tag(src, alt, dim("width"), dim("height"))
            }
            None => String::new(),
        },
        "link" => {
            let href = node.get("url").and_then(Value::as_str).unwrap_or_default();
            if is_safe_href(href) {
                format!(r#"<a href="{}">{}</a>"#, html_escape(href), children())
            } else {
                children()
            }
        }
        _ => children(),
    }
}

fn render_text(node: &Map<String, Value>) -> String {
    let flag = |key: &str| node.get(key).and_then(Value::as_bool).unwrap_or(false);
    let mut html = html_escape(node.get("text").and_then(Value::as_str).unwrap_or_default());

    for (key, tag) in [
        ("code", "code"),
        ("bold", "strong"),
        ("italic", "em"),
        ("underline", "u"),
        ("strikethrough", "del"),
    ] {
        if flag(key) {
            html = format!("<{0}>{1}</{0}>", tag, html);
        }
    }
    html
}

/// Concatenated text of a node's descendants
fn plain_text(node: &Map<String, Value>) -> String {
    let mut out = node
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if let Some(Value::Array(children)) = node.get("children") {
        for child in children.iter().filter_map(Value::as_object) {
            out.push_str(&plain_text(child));
        }
    }
    out
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return false;
    }
    if ["http://", "https://", "mailto:", "tel:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return true;
    }
    // Relative links only; any other scheme (javascript:, data:, ...) is refused
    !has_scheme(&lower)
}
