//! CLI entry point for marketorix-site

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "marketorix-site")]
#[command(version)]
#[command(about = "Marketing site and blog backed by a headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts from the content API
    List {
        /// Walk every page instead of only the first
        #[arg(short, long)]
        all: bool,
    },

    /// Show one post, rendered
    Show {
        /// Post slug
        slug: String,
    },

    /// Generate sitemap.xml
    Sitemap {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "marketorix_site=debug,info"
    } else {
        "marketorix_site=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = marketorix_site::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            marketorix_site::server::start(&site, &ip, port).await?;
        }

        Commands::List { all } => {
            let site = marketorix_site::Site::new(&base_dir)?;
            marketorix_site::commands::list::run(&site, all).await?;
        }

        Commands::Show { slug } => {
            let site = marketorix_site::Site::new(&base_dir)?;
            marketorix_site::commands::show::run(&site, &slug).await?;
        }

        Commands::Sitemap { output } => {
            let site = marketorix_site::Site::new(&base_dir)?;
            let output = output.map(|path| {
                if path.is_absolute() {
                    path
                } else {
                    base_dir.join(path)
                }
            });
            marketorix_site::commands::sitemap::run(&site, output.as_deref()).await?;
        }

        Commands::Version => {
            println!("marketorix-site version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
