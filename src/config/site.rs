//! Site configuration (lakesite.yml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable overriding `site_url`
pub const SITE_URL_ENV: &str = "LAKESITE_SITE_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL used when the settings document has none
    pub site_url: String,

    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub preview: PreviewConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost:3000".to_string(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            preview: PreviewConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.check()?;
        Ok(config)
    }

    /// Apply environment overrides on top of the file values
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SITE_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using site url from {}", SITE_URL_ENV);
                self.site_url = url;
            }
        }
    }

    /// Viewer token for draft reads, looked up through `store.token_env`
    pub fn viewer_token(&self) -> Option<String> {
        std::env::var(&self.store.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }

    fn check(&self) -> Result<()> {
        if self.store.export_path.is_none() && self.store.project_id.is_empty() {
            return Err(Error::Config(
                "store.project_id is required unless store.export_path is set".to_string(),
            ));
        }
        if !self.site_url.starts_with("http://") && !self.site_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "site_url must be an http(s) URL, got {:?}",
                self.site_url
            )));
        }
        Ok(())
    }
}

/// Content store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Serve published reads from the CDN host
    pub use_cdn: bool,
    /// Name of the environment variable holding the viewer token
    pub token_env: String,
    /// Studio base URL, used for edit links in preview overlays
    pub studio_url: String,
    /// Read documents from an NDJSON export instead of the HTTP API
    pub export_path: Option<String>,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: "production".to_string(),
            api_version: "2024-01-01".to_string(),
            use_cdn: true,
            token_env: "LAKESITE_VIEWER_TOKEN".to_string(),
            studio_url: "/studio".to_string(),
            export_path: None,
            timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Published-read cache
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            capacity: 256,
        }
    }
}

/// Draft/preview mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Shared secret expected by the enable endpoint
    pub secret: Option<String>,
    pub cookie: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            secret: None,
            cookie: "lakesite_draft".to_string(),
        }
    }
}
