//! Print one post

use anyhow::Result;

use crate::content::{ContentClient, MarkdownRenderer};
use crate::render::BlockRenderer;
use crate::Site;

/// Fetch a post by slug and print its metadata and rendered HTML
pub async fn run(site: &Site, slug: &str) -> Result<()> {
    let client = ContentClient::from_config(&site.config)?;
    let Some(post) = client.get_post_by_slug(slug).await else {
        anyhow::bail!("No post with slug: {}", slug);
    };

    let renderer = BlockRenderer::new(MarkdownRenderer::new());

    println!("Title:   {}", post.title);
    println!("Slug:    {}", post.slug);
    if let Some(created) = post.created_at {
        println!("Created: {}", created.to_rfc3339());
    }
    println!("Updated: {}", post.updated_at.to_rfc3339());
    println!("Blocks:  {}", post.content_blocks.len());
    println!();
    println!("{}", renderer.render_post(&post));

    Ok(())
}
