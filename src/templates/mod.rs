//! Page templates
//!
//! Pages are assembled with `format!`; every interpolated value goes through
//! [`html_escape`] unless it is already rendered HTML.

use chrono::{DateTime, Utc};

use crate::config::SiteConfig;
use crate::content::{PaginatedPosts, Post};
use crate::helpers::{
    encode_path_segment, encode_query_value, html_escape, image_tag, join_url, link_to, open_graph,
};

/// Number of posts on the home page
pub const HOME_POST_COUNT: u32 = 3;

/// Scroll loader for `/blog`.
///
/// Mirrors `IncrementalList`: `idle` -> `loading` -> `idle` | `exhausted`,
/// where a failed fetch is terminal.
const BLOG_LOADER_SCRIPT: &str = r#"
<script>
(function() {
    var sentinel = document.getElementById('post-sentinel');
    var list = document.getElementById('post-list');
    if (!sentinel || !list) return;

    var state = sentinel.dataset.state;
    var nextPage = parseInt(sentinel.dataset.nextPage, 10);
    var pageSize = parseInt(sentinel.dataset.pageSize, 10);

    function text(tag, className, value) {
        var el = document.createElement(tag);
        el.className = className;
        el.textContent = value;
        return el;
    }

    function card(post) {
        var article = document.createElement('article');
        article.className = 'post-card';
        var link = document.createElement('a');
        link.href = '/blog/' + encodeURIComponent(post.slug);
        if (post.featuredImageUrl) {
            var img = document.createElement('img');
            img.src = post.featuredImageUrl;
            img.alt = post.featuredImageAlt || post.title;
            img.loading = 'lazy';
            link.appendChild(img);
        }
        link.appendChild(text('h2', 'post-card-title', post.title));
        article.appendChild(link);
        if (post.excerpt) article.appendChild(text('p', 'post-card-excerpt', post.excerpt));
        return article;
    }

    function setState(next) {
        state = next;
        sentinel.dataset.state = next;
        if (next === 'exhausted') {
            observer.disconnect();
        } else if (next === 'idle') {
            // Re-observe so a sentinel still in view triggers the next page
            observer.unobserve(sentinel);
            observer.observe(sentinel);
        }
    }

    function load() {
        if (state !== 'idle') return;
        setState('loading');
        fetch('/api/posts?page=' + nextPage + '&pageSize=' + pageSize)
            .then(function(res) {
                if (!res.ok) throw new Error('HTTP ' + res.status);
                return res.json();
            })
            .then(function(data) {
                data.posts.forEach(function(post) { list.appendChild(card(post)); });
                nextPage += 1;
                setState(data.pagination.page >= data.pagination.pageCount ? 'exhausted' : 'idle');
            })
            .catch(function(err) {
                console.error('Failed to load posts:', err);
                setState('exhausted');
            });
    }

    var observer = new IntersectionObserver(function(entries) {
        if (entries.some(function(e) { return e.isIntersecting; })) load();
    });
    if (state === 'idle') observer.observe(sentinel);
})();
</script>
"#;

/// Contact form submitter; posts JSON to `/api/sendMail`
const CONTACT_FORM_SCRIPT: &str = r#"
<script>
(function() {
    var form = document.getElementById('contact-form');
    var status = document.getElementById('contact-status');
    if (!form || !status) return;
    var siteKey = form.dataset.siteKey;

    function token() {
        if (!siteKey || !window.grecaptcha) return Promise.resolve('');
        return new Promise(function(resolve) {
            grecaptcha.ready(function() {
                grecaptcha.execute(siteKey, { action: 'contact' }).then(resolve, function() { resolve(''); });
            });
        });
    }

    form.addEventListener('submit', function(e) {
        e.preventDefault();
        var button = form.querySelector('button[type=submit]');
        button.disabled = true;
        token().then(function(recaptchaToken) {
            var payload = {
                name: form.elements.name.value,
                email: form.elements.email.value,
                message: form.elements.message.value,
                honeypot: form.elements.honeypot.value,
                recaptchaToken: recaptchaToken
            };
            return fetch('/api/sendMail', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(payload)
            });
        }).then(function(res) {
            if (!res.ok) throw new Error('HTTP ' + res.status);
            status.textContent = 'Message sent successfully!';
            form.reset();
        }).catch(function(err) {
            console.error('Failed to send message:', err);
            status.textContent = 'Failed to send message. Please try again later.';
        }).then(function() {
            button.disabled = false;
        });
    });
})();
</script>
"#;

/// Per-page head values
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    /// Path relative to the site root
    pub path: String,
    pub image: Option<String>,
}

/// Wrap a page body in the site layout
pub fn layout(site: &SiteConfig, meta: &PageMeta, body: &str) -> String {
    let title = if meta.title.is_empty() || meta.title == site.title {
        site.title.clone()
    } else {
        format!("{} | {}", meta.title, site.title)
    };
    let description = if meta.description.is_empty() {
        site.description.as_str()
    } else {
        meta.description.as_str()
    };
    let url = join_url(site.site_url(), meta.path.trim_start_matches('/'));

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(&title)));
    if !description.is_empty() {
        html.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">\n",
            html_escape(description)
        ));
    }
    html.push_str(&format!("<link rel=\"canonical\" href=\"{}\">\n", html_escape(&url)));
    html.push_str(&open_graph(
        &title,
        description,
        &url,
        meta.image.as_deref(),
        &site.title,
    ));
    html.push_str("\n<link rel=\"stylesheet\" href=\"/css/style.css\">\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header class=\"site-header\">\n<nav>\n");
    html.push_str(&link_to("/", &site.title));
    html.push('\n');
    html.push_str(&link_to("/blog", "Blog"));
    html.push('\n');
    html.push_str(&link_to("/contact", "Contact"));
    html.push_str("\n</nav>\n</header>\n");

    html.push_str("<main>\n");
    html.push_str(body);
    html.push_str("\n</main>\n");

    html.push_str(&format!(
        "<footer class=\"site-footer\">&copy; {} {}</footer>\n",
        Utc::now().format("%Y"),
        html_escape(&site.title)
    ));
    html.push_str("</body>\n</html>\n");
    html
}

/// Home page with the latest posts
pub fn home(site: &SiteConfig, latest: &[Post]) -> String {
    let mut body = String::new();
    body.push_str(&format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n</section>\n",
        html_escape(&site.title),
        html_escape(&site.description)
    ));

    if !latest.is_empty() {
        body.push_str("<section class=\"latest-posts\">\n<h2>Latest posts</h2>\n");
        for post in latest {
            body.push_str(&post_card(post));
        }
        body.push_str(&link_to("/blog", "All posts"));
        body.push_str("\n</section>\n");
    }

    let meta = PageMeta {
        title: site.title.clone(),
        description: site.description.clone(),
        path: "/".to_string(),
        image: None,
    };
    layout(site, &meta, &body)
}

/// Blog index: the first page plus the scroll sentinel
pub fn blog_index(site: &SiteConfig, first_page: &PaginatedPosts, page_size: u32) -> String {
    let mut body = String::from("<h1>Blog</h1>\n");

    if first_page.posts.is_empty() {
        body.push_str("<p class=\"empty\">No posts yet.</p>\n");
    }

    body.push_str("<div id=\"post-list\" class=\"post-list\">\n");
    for post in &first_page.posts {
        body.push_str(&post_card(post));
    }
    body.push_str("</div>\n");

    let state = if first_page.pagination.has_more() {
        "idle"
    } else {
        "exhausted"
    };
    body.push_str(&format!(
        "<div id=\"post-sentinel\" data-state=\"{}\" data-next-page=\"2\" data-page-size=\"{}\"></div>\n",
        state, page_size
    ));
    body.push_str(BLOG_LOADER_SCRIPT);

    let meta = PageMeta {
        title: "Blog".to_string(),
        description: site.description.clone(),
        path: "/blog".to_string(),
        image: None,
    };
    layout(site, &meta, &body)
}

/// Full post page; `content` is the rendered body and blocks
pub fn post_page(site: &SiteConfig, post: &Post, content: &str) -> String {
    let mut body = String::from("<article class=\"post\">\n");
    body.push_str(&format!(
        "<h1 class=\"post-title\">{}</h1>\n",
        html_escape(&post.title)
    ));
    if let Some(date) = post.created_at {
        body.push_str(&format!(
            "<time class=\"post-date\" datetime=\"{}\">{}</time>\n",
            date.to_rfc3339(),
            format_date(&date)
        ));
    }
    if let Some(url) = &post.featured_image_url {
        let alt = post.featured_image_alt.as_deref().unwrap_or(&post.title);
        body.push_str(&format!(
            "<figure class=\"post-cover\">{}</figure>\n",
            image_tag(url, alt, None, None)
        ));
    }
    body.push_str(content);
    body.push_str("\n</article>\n");

    let meta = PageMeta {
        title: post.page_title().to_string(),
        description: post.page_description().to_string(),
        path: format!("/blog/{}", encode_path_segment(&post.slug)),
        image: post.featured_image_url.clone(),
    };
    layout(site, &meta, &body)
}

/// Contact page with the mail relay form
pub fn contact(site: &SiteConfig) -> String {
    let site_key = site.recaptcha.site_key.as_deref().unwrap_or_default();

    let mut body = String::from("<section class=\"contact\">\n<h1>Contact Us</h1>\n");
    body.push_str(&format!(
        "<form id=\"contact-form\" data-site-key=\"{}\">\n",
        html_escape(site_key)
    ));
    body.push_str(
        "<label for=\"name\">Name</label>\n\
         <input type=\"text\" id=\"name\" name=\"name\" required>\n\
         <label for=\"email\">Email</label>\n\
         <input type=\"email\" id=\"email\" name=\"email\" required>\n\
         <label for=\"message\">Message</label>\n\
         <textarea id=\"message\" name=\"message\" rows=\"6\" required></textarea>\n",
    );
    // Hidden from people; bots filling every field trip it
    body.push_str(
        "<div class=\"hp\" aria-hidden=\"true\" style=\"position:absolute;left:-10000px\">\n\
         <input type=\"text\" name=\"honeypot\" tabindex=\"-1\" autocomplete=\"off\">\n\
         </div>\n",
    );
    body.push_str("<button type=\"submit\">Send Message</button>\n</form>\n");
    body.push_str("<p id=\"contact-status\" role=\"status\"></p>\n</section>\n");

    if !site_key.is_empty() {
        body.push_str(&format!(
            "<script src=\"https://www.google.com/recaptcha/api.js?render={}\"></script>\n",
            encode_query_value(site_key)
        ));
    }
    body.push_str(CONTACT_FORM_SCRIPT);

    let meta = PageMeta {
        title: "Contact".to_string(),
        description: format!("Get in touch with {}", site.title),
        path: "/contact".to_string(),
        image: None,
    };
    layout(site, &meta, &body)
}

/// Page for unknown routes and missing posts
pub fn not_found(site: &SiteConfig) -> String {
    let body = format!(
        "<section class=\"not-found\">\n<h1>Page not found</h1>\n<p>{}</p>\n</section>\n",
        link_to("/blog", "Back to the blog")
    );
    let meta = PageMeta {
        title: "Page not found".to_string(),
        ..PageMeta::default()
    };
    layout(site, &meta, &body)
}

/// Summary card used on the home page and blog index
pub fn post_card(post: &Post) -> String {
    let href = html_escape(&format!("/blog/{}", encode_path_segment(&post.slug)));
    let mut html = String::from("<article class=\"post-card\">\n");
    html.push_str(&format!("<a href=\"{}\">", href));
    if let Some(url) = &post.featured_image_url {
        let alt = post.featured_image_alt.as_deref().unwrap_or(&post.title);
        html.push_str(&image_tag(url, alt, None, None));
    }
    html.push_str(&format!(
        "<h2 class=\"post-card-title\">{}</h2></a>\n",
        html_escape(&post.title)
    ));
    if !post.excerpt.is_empty() {
        html.push_str(&format!(
            "<p class=\"post-card-excerpt\">{}</p>\n",
            html_escape(&truncate_chars(&post.excerpt, 200))
        ));
    }
    if let Some(date) = post.created_at {
        html.push_str(&format!(
            "<time class=\"post-date\">{}</time>\n",
            format_date(&date)
        ));
    }
    html.push_str("</article>\n");
    html
}

/// "May 30, 2026"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Truncate by character count, appending an ellipsis when cut
fn truncate_chars(s: &str, length: usize) -> String {
    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(length).collect();
        format!("{}…", truncated.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Pagination;
    use chrono::TimeZone;

    fn post() -> Post {
        Post {
            id: "1".to_string(),
            title: "Hello <world>".to_string(),
            excerpt: "Short & sweet".to_string(),
            slug: "hello-world".to_string(),
            body: String::new(),
            featured_image_url: Some("https://cms.example.com/uploads/a.png".to_string()),
            featured_image_alt: None,
            content_blocks: Vec::new(),
            meta_title: Some("Hello SEO".to_string()),
            meta_description: None,
            created_at: Some(Utc.with_ymd_and_hms(2026, 5, 30, 8, 0, 0).unwrap()),
            updated_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_post_card_escapes() {
        let card = post_card(&post());
        assert!(card.contains(r#"<a href="/blog/hello-world">"#));
        assert!(card.contains("Hello &lt;world&gt;"));
        assert!(card.contains("Short &amp; sweet"));
        assert!(card.contains("May 30, 2026"));
        assert!(card.contains(r#"alt="Hello &lt;world&gt;""#));
    }

    #[test]
    fn test_post_page_meta() {
        let site = SiteConfig::default();
        let html = post_page(&site, &post(), "<p>body</p>");
        assert!(html.contains("<title>Hello SEO | Marketorix</title>"));
        assert!(html.contains(r#"content="Short &amp; sweet""#));
        assert!(html.contains(r#"<link rel="canonical" href="http://localhost:4000/blog/hello-world">"#));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains("og:image"));
    }

    #[test]
    fn test_blog_index_sentinel_state() {
        let site = SiteConfig::default();
        let page = PaginatedPosts {
            posts: vec![post()],
            pagination: Pagination {
                page: 1,
                page_size: 5,
                page_count: 3,
                total: 11,
            },
        };
        let html = blog_index(&site, &page, 5);
        assert!(html.contains(r#"data-state="idle""#));
        assert!(html.contains(r#"data-page-size="5""#));
        assert!(html.contains("/api/posts?page="));

        let html = blog_index(&site, &PaginatedPosts::empty(), 5);
        assert!(html.contains(r#"data-state="exhausted""#));
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_blog_loader_reobserves_when_idle() {
        let html = blog_index(&SiteConfig::default(), &PaginatedPosts::empty(), 5);
        let idle = html.find("next === 'idle'").unwrap();
        let reobserve = html.find("observer.observe(sentinel);").unwrap();
        assert!(html.contains("observer.unobserve(sentinel);"));
        assert!(reobserve > idle);
    }

    #[test]
    fn test_post_card_encodes_slug() {
        let mut p = post();
        p.slug = "café & co".to_string();
        assert!(post_card(&p).contains(r#"<a href="/blog/caf%C3%A9%20%26%20co">"#));
    }

    #[test]
    fn test_contact_form() {
        let html = contact(&SiteConfig::default());
        assert!(html.contains(r#"id="contact-form""#));
        for field in ["name=\"name\"", "name=\"email\"", "name=\"message\"", "name=\"honeypot\""] {
            assert!(html.contains(field), "missing {}", field);
        }
        assert!(html.contains("recaptchaToken"));
        assert!(html.contains("/api/sendMail"));
        assert!(!html.contains("recaptcha/api.js"));

        let mut site = SiteConfig::default();
        site.recaptcha.site_key = Some("6Lc-public".to_string());
        let html = contact(&site);
        assert!(html.contains(r#"data-site-key="6Lc-public""#));
        assert!(html.contains("recaptcha/api.js?render=6Lc-public"));
    }

    #[test]
    fn test_home_lists_posts() {
        let site = SiteConfig::default();
        let html = home(&site, &[post()]);
        assert!(html.contains("Latest posts"));
        assert!(html.contains("<title>Marketorix</title>"));

        let html = home(&site, &[]);
        assert!(!html.contains("Latest posts"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("héllo wörld", 6), "héllo…");
    }
}
