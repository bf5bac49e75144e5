//! List posts from the content API

use anyhow::Result;

use crate::content::{ContentClient, Post};
use crate::listing::{IncrementalList, PageSource};
use crate::Site;

/// Print the first page of posts, or every page with `all`
pub async fn run(site: &Site, all: bool) -> Result<()> {
    let client = ContentClient::from_config(&site.config)?;
    let page_size = site.config.content.posts_per_page;

    let first_page = client.list_posts(1, page_size).await;
    let total = first_page.pagination.total;
    let posts = collect(&client, first_page, page_size, all).await;

    println!("Posts ({} of {}):", posts.len(), total);
    for post in &posts {
        println!("{}", format_line(post));
    }

    Ok(())
}

/// Seed a list with the first page and, with `all`, keep loading until
/// the source is exhausted
pub async fn collect<S>(
    source: &S,
    first_page: crate::content::PaginatedPosts,
    page_size: u32,
    all: bool,
) -> Vec<Post>
where
    S: PageSource + ?Sized,
{
    let mut list = IncrementalList::seeded(first_page, page_size);
    if all {
        while list.on_sentinel_visible(source).await {
            tracing::debug!("Loaded {} posts so far", list.posts().len());
        }
    }
    list.into_posts()
}

fn format_line(post: &Post) -> String {
    let date = post
        .created_at
        .unwrap_or(post.updated_at)
        .format("%Y-%m-%d");
    format!("  {} - {} [{}]", date, post.title, post.slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::FakeTransport;
    use std::sync::Arc;
    use url::Url;

    fn client(total: u32) -> ContentClient {
        let base = Url::parse("https://cms.example.com").unwrap();
        ContentClient::new(&base, Arc::new(FakeTransport::paged(total)))
    }

    #[tokio::test]
    async fn test_collect_first_page_only() {
        let client = client(12);
        let first = client.list_posts(1, 5).await;
        let posts = collect(&client, first, 5, false).await;
        assert_eq!(posts.len(), 5);
    }

    #[tokio::test]
    async fn test_collect_all_pages() {
        let client = client(12);
        let first = client.list_posts(1, 5).await;
        let posts = collect(&client, first, 5, true).await;
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.clone()).collect();
        assert_eq!(slugs.len(), 12);
        assert_eq!(slugs[0], "post-1");
        assert_eq!(slugs[11], "post-12");
    }

    #[tokio::test]
    async fn test_format_line() {
        let client = client(1);
        let post = client.get_post_by_slug("post-1").await.unwrap();
        assert_eq!(format_line(&post), "  2026-01-01 - Post 1 [post-1]");
    }
}
