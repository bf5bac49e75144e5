//! Write the sitemap

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::content::ContentClient;
use crate::sitemap;
use crate::Site;

/// Generate `sitemap.xml` to a file, or stdout when no path is given
pub async fn run(site: &Site, output: Option<&Path>) -> Result<()> {
    let client = ContentClient::from_config(&site.config)?;
    let entries = sitemap::generate(site.config.site_url(), &client).await;
    let xml = sitemap::to_xml(&entries);

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            fs::write(path, xml)?;
            tracing::info!("Wrote {} sitemap entries to {:?}", entries.len(), path);
        }
        None => print!("{}", xml),
    }

    Ok(())
}
