//! HTTP server

mod handlers;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ContentClient, MarkdownRenderer};
use crate::mail::{MailRelay, RecaptchaVerifier, SmtpMailer};
use crate::render::BlockRenderer;
use crate::Site;

/// Upper bound for `pageSize` on `/api/posts`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Shared request state
pub struct AppState {
    pub config: SiteConfig,
    pub content: ContentClient,
    pub blocks: BlockRenderer,
    pub relay: MailRelay,
    pub public_dir: std::path::PathBuf,
}

impl AppState {
    /// Wire up the production collaborators for a site
    pub fn from_site(site: &Site) -> Result<Self> {
        let content = ContentClient::from_config(&site.config)?;
        let relay = MailRelay::new(
            RecaptchaVerifier::from_config(&site.config.recaptcha),
            SmtpMailer::from_config(&site.config.mail),
            site.config.mail.subject_prefix.clone(),
        );

        Ok(Self {
            config: site.config.clone(),
            content,
            blocks: BlockRenderer::new(MarkdownRenderer::new()),
            relay,
            public_dir: site.public_dir.clone(),
        })
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/", get(handlers::home))
        .route("/blog", get(handlers::blog_index))
        .route("/blog/:slug", get(handlers::blog_post))
        .route("/contact", get(handlers::contact))
        .route("/api/posts", get(handlers::api_posts))
        .route("/api/sendMail", post(handlers::send_mail))
        .route("/sitemap.xml", get(handlers::sitemap_xml))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_site(site)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
