//! lakesite: a content-managed site served from a headless content store
//!
//! Pages, posts and site settings live in a hosted document store and are
//! read through typed queries. This crate resolves SEO metadata, redirects,
//! sitemaps and other site artifacts from that content and serves them over
//! HTTP.

pub mod artifacts;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod helpers;
pub mod query;
pub mod redirect;
pub mod schema;
pub mod seo;
pub mod server;
pub mod sitemap;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use client::ContentClient;
use redirect::RedirectResolver;
use seo::SeoContext;

/// Name of the configuration file in the base directory
pub const CONFIG_FILE: &str = "lakesite.yml";

/// The main application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content store client
    pub client: ContentClient,
}

impl Site {
    /// Create a new Site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::warn!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        let client = ContentClient::from_config(&config, &base_dir)?;
        Ok(Self {
            config,
            base_dir,
            client,
        })
    }

    /// Create a Site around an existing client
    pub fn with_client(config: config::SiteConfig, base_dir: PathBuf, client: ContentClient) -> Self {
        Self {
            config,
            base_dir,
            client,
        }
    }

    pub fn redirects(&self) -> RedirectResolver {
        RedirectResolver::new(self.client.clone())
    }

    /// Inputs for the SEO resolver that come from configuration
    pub fn seo_context(&self) -> SeoContext<'_> {
        SeoContext {
            site_url: &self.config.site_url,
            images: self.client.images(),
        }
    }
}
