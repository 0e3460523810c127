//! Content sources: where query results come from
//!
//! The HTTP API of the hosted store is the normal source. An NDJSON dataset
//! export can stand in for it (local development, tests, offline builds);
//! queries then run in memory through [`Query::evaluate`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::query::Query;

/// Prefix of draft document ids
pub const DRAFTS_PREFIX: &str = "drafts.";

/// Which document versions a read sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    /// Published documents only
    Published,
    /// Drafts layered over their published versions
    Drafts,
}

impl Perspective {
    pub fn as_str(self) -> &'static str {
        match self {
            Perspective::Published => "published",
            Perspective::Drafts => "drafts",
        }
    }
}

/// Something that can answer queries
#[async_trait]
pub trait ContentSource: Send + Sync + 'static {
    /// Run `query` and return the raw result (`null`, an object or an array)
    async fn query(
        &self,
        query: &Query,
        perspective: Perspective,
        token: Option<&str>,
    ) -> Result<Value>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Value,
}

/// The hosted query API
pub struct HttpSource {
    client: reqwest::Client,
    project_id: String,
    dataset: String,
    api_version: String,
    use_cdn: bool,
}

impl HttpSource {
    pub fn new(store: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(store.timeout())
            .user_agent(concat!("lakesite/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            project_id: store.project_id.clone(),
            dataset: store.dataset.clone(),
            api_version: store.api_version.clone(),
            use_cdn: store.use_cdn,
        })
    }

    /// Query endpoint; authenticated and draft reads never use the CDN
    pub fn endpoint(&self, perspective: Perspective, authenticated: bool) -> String {
        let host = if self.use_cdn && !authenticated && perspective == Perspective::Published {
            "apicdn"
        } else {
            "api"
        };
        format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.project_id,
            host,
            self.api_version.trim_start_matches('v'),
            self.dataset
        )
    }

    /// URL parameters: the GROQ text, `$`-prefixed JSON params, perspective
    pub fn query_pairs(query: &Query, perspective: Perspective) -> Vec<(String, String)> {
        let mut pairs = vec![("query".to_string(), query.to_groq())];
        for (name, value) in query.params() {
            pairs.push((format!("${}", name), value.to_string()));
        }
        pairs.push(("perspective".to_string(), perspective.as_str().to_string()));
        pairs
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn query(
        &self,
        query: &Query,
        perspective: Perspective,
        token: Option<&str>,
    ) -> Result<Value> {
        let url = self.endpoint(perspective, token.is_some());
        let mut request = self
            .client
            .get(&url)
            .query(&Self::query_pairs(query, perspective));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }
        let body: QueryResponse = response.json().await?;
        Ok(body.result)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Documents held in memory, typically loaded from an NDJSON export
pub struct MemorySource {
    docs: Vec<Value>,
    /// Fixed clock for `now()`; the wall clock when unset
    now: Option<DateTime<Utc>>,
}

impl MemorySource {
    pub fn new(docs: Vec<Value>) -> Self {
        Self { docs, now: None }
    }

    /// Parse one JSON document per line; blank lines are skipped
    pub fn from_ndjson_str(content: &str) -> Result<Self> {
        let docs = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        Ok(Self::new(docs))
    }

    pub fn from_ndjson<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let source = Self::from_ndjson_str(&content)?;
        tracing::info!("Loaded {} documents from {:?}", source.docs.len(), path);
        Ok(source)
    }

    /// Evaluate `now()` at a fixed instant
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn documents(&self) -> &[Value] {
        &self.docs
    }

    /// The document set as seen through `perspective`
    pub fn view(&self, perspective: Perspective) -> Vec<Value> {
        match perspective {
            Perspective::Published => self
                .docs
                .iter()
                .filter(|d| !doc_id(d).starts_with(DRAFTS_PREFIX))
                .cloned()
                .collect(),
            Perspective::Drafts => {
                let mut order: Vec<String> = Vec::new();
                let mut by_id: HashMap<String, Value> = HashMap::new();
                for doc in &self.docs {
                    let id = doc_id(doc);
                    let (base, is_draft) = match id.strip_prefix(DRAFTS_PREFIX) {
                        Some(base) => (base.to_string(), true),
                        None => (id.to_string(), false),
                    };
                    if !by_id.contains_key(&base) {
                        order.push(base.clone());
                    }
                    if is_draft {
                        let mut draft = doc.clone();
                        if let Some(obj) = draft.as_object_mut() {
                            obj.insert("_id".to_string(), Value::String(base.clone()));
                            obj.insert("_originalId".to_string(), Value::String(id.to_string()));
                        }
                        by_id.insert(base, draft);
                    } else {
                        // A draft, if already seen, wins over the published copy
                        let overlaid = by_id
                            .get(&base)
                            .and_then(|d| d.get("_originalId"))
                            .is_some();
                        if !overlaid {
                            by_id.insert(base, doc.clone());
                        }
                    }
                }
                order
                    .into_iter()
                    .filter_map(|id| by_id.remove(&id))
                    .collect()
            }
        }
    }
}

fn doc_id(doc: &Value) -> &str {
    doc.get("_id").and_then(Value::as_str).unwrap_or("")
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn query(
        &self,
        query: &Query,
        perspective: Perspective,
        _token: Option<&str>,
    ) -> Result<Value> {
        let docs = self.view(perspective);
        query.evaluate(&docs, self.now.unwrap_or_else(Utc::now))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
