//! Content client
//!
//! Executes [`Query`] definitions against a [`ContentSource`] in one of two
//! modes. Published reads go through the result cache. Draft reads require
//! the viewer token, skip the cache and are annotated for live preview.

pub mod cache;
pub mod preview;
mod source;

pub use cache::QueryCache;
pub use source::{ContentSource, HttpSource, MemorySource, Perspective, DRAFTS_PREFIX};

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::{Error, Result};
use crate::helpers::ImageUrlBuilder;
use crate::query::{catalog, Query};
use crate::schema::SiteSettings;

/// How a request reads content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMode {
    /// Published documents, cached
    #[default]
    Published,
    /// Drafts included, uncached, authenticated
    Draft,
}

impl FetchMode {
    pub fn perspective(self) -> Perspective {
        match self {
            FetchMode::Published => Perspective::Published,
            FetchMode::Draft => Perspective::Drafts,
        }
    }

    pub fn is_draft(self) -> bool {
        self == FetchMode::Draft
    }
}

/// Query executor shared by every request
#[derive(Clone)]
pub struct ContentClient {
    source: Arc<dyn ContentSource>,
    cache: Arc<QueryCache>,
    token: Option<String>,
    studio_url: String,
    images: ImageUrlBuilder,
}

impl ContentClient {
    pub fn new(source: Arc<dyn ContentSource>, config: &SiteConfig) -> Self {
        Self {
            source,
            cache: Arc::new(QueryCache::new(&config.cache)),
            token: config.viewer_token(),
            studio_url: config.store.studio_url.clone(),
            images: ImageUrlBuilder::new(&config.store.project_id, &config.store.dataset),
        }
    }

    /// Build the source the configuration asks for
    ///
    /// A relative `export_path` is resolved against `base_dir`.
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Result<Self> {
        let source: Arc<dyn ContentSource> = match &config.store.export_path {
            Some(path) => Arc::new(MemorySource::from_ndjson(base_dir.join(path))?),
            None => Arc::new(HttpSource::new(&config.store)?),
        };
        tracing::debug!("Using {} content source", source.name());
        Ok(Self::new(source, config))
    }

    /// Override the viewer token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Drop every cached result
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    /// Run a query and return the raw result
    pub async fn fetch_value(&self, query: &Query, mode: FetchMode) -> Result<Value> {
        match mode {
            FetchMode::Published => {
                let key = cache::hash_query(query);
                if let Some(hit) = self.cache.get(key) {
                    tracing::debug!("Cache hit: {}", query.to_groq());
                    return Ok(hit);
                }
                tracing::debug!("Fetching: {}", query.to_groq());
                let value = self
                    .source
                    .query(query, Perspective::Published, None)
                    .await?;
                self.cache.insert(key, value.clone());
                Ok(value)
            }
            FetchMode::Draft => {
                let token = self.token.as_deref().ok_or(Error::MissingToken)?;
                tracing::debug!("Fetching draft: {}", query.to_groq());
                let mut value = self
                    .source
                    .query(query, Perspective::Drafts, Some(token))
                    .await?;
                preview::annotate(&mut value, &self.studio_url, &self.images);
                Ok(value)
            }
        }
    }

    /// Run a query and decode the result
    pub async fn fetch<T: DeserializeOwned>(&self, query: &Query, mode: FetchMode) -> Result<T> {
        let value = self.fetch_value(query, mode).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Run a single-document query; `null` becomes `None`
    pub async fn fetch_one<T: DeserializeOwned>(
        &self,
        query: &Query,
        mode: FetchMode,
    ) -> Result<Option<T>> {
        match self.fetch_value(query, mode).await? {
            Value::Null => Ok(None),
            value => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// The settings singleton, best effort
    ///
    /// Only the first document is used. Failures are logged and treated as
    /// "no settings" so callers fall back to defaults.
    pub async fn site_settings(&self, mode: FetchMode) -> Option<SiteSettings> {
        match self
            .fetch::<Vec<SiteSettings>>(&catalog::site_settings(), mode)
            .await
        {
            Ok(settings) => settings.into_iter().next(),
            Err(e) => {
                tracing::warn!("Failed to fetch site settings: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Page;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls and fails on demand
    struct CountingSource {
        inner: MemorySource,
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ContentSource for CountingSource {
        async fn query(
            &self,
            query: &Query,
            perspective: Perspective,
            token: Option<&str>,
        ) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            self.inner.query(query, perspective, token).await
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn docs() -> Vec<Value> {
        vec![
            json!({"_id": "home", "_type": "page", "title": "Home", "slug": {"current": "/"},
                   "featuredImage": {"asset": {"_ref": "image-abc-10x10-png"}}}),
            json!({"_id": "drafts.home", "_type": "page", "title": "Home v2", "slug": {"current": "/"}}),
            json!({"_id": "s1", "_type": "siteSettings", "siteName": "Acme"}),
            json!({"_id": "s2", "_type": "siteSettings", "siteName": "Ignored"}),
        ]
    }

    fn make_client(fail: bool) -> (ContentClient, Arc<CountingSource>) {
        let source = Arc::new(CountingSource {
            inner: MemorySource::new(docs()),
            calls: AtomicUsize::new(0),
            fail,
        });
        let mut config = SiteConfig::default();
        config.store.project_id = "proj".to_string();
        let client = ContentClient::new(source.clone(), &config).with_token(None);
        (client, source)
    }

    #[tokio::test]
    async fn test_published_reads_are_cached() {
        let (client, source) = make_client(false);
        let query = catalog::page_by_slug("/");
        let first: Option<Page> = client.fetch_one(&query, FetchMode::Published).await.unwrap();
        let second: Option<Page> = client.fetch_one(&query, FetchMode::Published).await.unwrap();
        assert_eq!(first.unwrap().title, "Home");
        assert_eq!(second.unwrap().title, "Home");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        client.invalidate();
        let _: Option<Page> = client.fetch_one(&query, FetchMode::Published).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_draft_requires_token_and_bypasses_cache() {
        let (client, source) = make_client(false);
        let query = catalog::page_by_slug("/");
        let err = client
            .fetch_value(&query, FetchMode::Draft)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingToken));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);

        let client = client.with_token(Some("secret".to_string()));
        for _ in 0..2 {
            let page = client.fetch_value(&query, FetchMode::Draft).await.unwrap();
            assert_eq!(page["title"], "Home v2");
            assert_eq!(page["_editUrl"], "/studio/intent/edit/id=home;type=page");
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_same_query_in_both_modes() {
        let (client, _) = make_client(false);
        let client = client.with_token(Some("secret".to_string()));
        let query = catalog::page_by_slug("/");
        let published: Page = client.fetch(&query, FetchMode::Published).await.unwrap();
        let draft: Page = client.fetch(&query, FetchMode::Draft).await.unwrap();
        assert_eq!(published.title, "Home");
        assert_eq!(draft.title, "Home v2");
    }

    #[tokio::test]
    async fn test_site_settings_best_effort() {
        let (client, _) = make_client(false);
        let settings = client.site_settings(FetchMode::Published).await.unwrap();
        assert_eq!(settings.site_name, "Acme");

        let (failing, _) = make_client(true);
        assert!(failing.site_settings(FetchMode::Published).await.is_none());
    }
}
