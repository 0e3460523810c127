//! CLI entry point for lakesite

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lakesite")]
#[command(version)]
#[command(about = "Serve a website from a headless content store", long_about = None)]
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
    /// Start the site server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List published documents
    List {
        /// Type of content to list (page, post, author, category, legal, redirect)
        #[arg(default_value = "page")]
        r#type: String,
    },

    /// Check an NDJSON export against the document rules
    Validate {
        /// Path to the export file
        export: PathBuf,
    },

    /// Write sitemap, robots.txt, manifest and generated images
    Export {
        /// Output directory
        #[arg(short, long, default_value = "public")]
        out: PathBuf,
    },

    /// Show the redirect for a path
    Redirect {
        /// Request path, e.g. /old-page
        path: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "lakesite=debug,info"
    } else {
        "lakesite=info"
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
            let site = lakesite::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            lakesite::server::start(site, &ip, port).await?;
        }

        Commands::List { r#type } => {
            let site = lakesite::Site::new(&base_dir)?;
            lakesite::commands::list::run(&site, &r#type).await?;
        }

        Commands::Validate { export } => {
            let export = if export.is_absolute() {
                export
            } else {
                base_dir.join(export)
            };
            lakesite::commands::validate::run(&export)?;
        }

        Commands::Export { out } => {
            let site = lakesite::Site::new(&base_dir)?;
            let out = if out.is_absolute() {
                out
            } else {
                base_dir.join(out)
            };
            lakesite::commands::export::run(&site, &out).await?;
        }

        Commands::Redirect { path } => {
            let site = lakesite::Site::new(&base_dir)?;
            lakesite::commands::redirect::run(&site, &path).await?;
        }

        Commands::Version => {
            println!("lakesite version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
