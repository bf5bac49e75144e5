//! marketorix-site: server-rendered marketing site and blog
//!
//! Posts come from a headless CMS over HTTP; pages, the sitemap and the
//! contact form relay are served by a single axum application.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod listing;
pub mod mail;
pub mod render;
pub mod server;
pub mod sitemap;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration, environment overrides applied
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Static assets directory
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Create a site from a directory.
    ///
    /// Reads `.env` and `_config.yml` when present; environment variables
    /// override file settings.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)?;
            tracing::debug!("Loaded environment from {:?}", env_path);
        }

        let config_path = base_dir.join("_config.yml");
        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }
}
