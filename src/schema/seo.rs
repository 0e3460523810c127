//! Embedded SEO object shared by pages, posts, authors, categories and settings

use serde::{Deserialize, Serialize};

use super::common::{nullable, Image};
use super::rules::{Rules, Severity};

/// Schema types offered for structured data fragments
pub const SCHEMA_TYPES: &[&str] = &[
    "Article",
    "BlogPosting",
    "NewsArticle",
    "Organization",
    "Person",
    "Product",
    "Recipe",
    "Review",
    "Event",
    "FAQ",
    "HowTo",
    "LocalBusiness",
    "WebPage",
];

/// Twitter card kinds
pub const TWITTER_CARDS: &[&str] = &["summary", "summary_large_image", "app", "player"];

/// Per-document search and social overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Seo {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub keywords: Vec<String>,
    pub image: Option<Image>,
    /// Tri-state: unset and `false` are resolved differently by callers
    pub no_index: Option<bool>,
    pub no_follow: Option<bool>,
    pub canonical_url: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub structured_data: Vec<StructuredDataItem>,
    pub open_graph: Option<OpenGraphSettings>,
    pub twitter: Option<TwitterSettings>,
}

/// One JSON-LD fragment, stored as raw text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredDataItem {
    #[serde(rename = "_key")]
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub data: Option<String>,
}

impl StructuredDataItem {
    pub fn new(schema_type: &str, data: &str) -> Self {
        Self {
            key: None,
            schema_type: Some(schema_type.to_string()),
            data: Some(data.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenGraphSettings {
    #[serde(rename = "type")]
    pub og_type: Option<String>,
    pub locale: Option<String>,
    pub site_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterSettings {
    pub card: Option<String>,
    pub site: Option<String>,
    pub creator: Option<String>,
}

impl Seo {
    /// Field rules for the SEO object
    pub fn check(&self, rules: &mut Rules) {
        rules.max_chars(
            "title",
            self.title.as_deref(),
            60,
            Severity::Warning,
            "SEO titles should be under 60 characters for optimal display in search results",
        );
        rules.max_chars(
            "description",
            self.description.as_deref(),
            160,
            Severity::Warning,
            "Meta descriptions should be under 160 characters for optimal display in search results",
        );
        if let Some(image) = &self.image {
            rules.scope("image", |r| {
                r.required_str("alt", image.alt.as_deref());
            });
        }
        rules.url("canonicalUrl", self.canonical_url.as_deref(), &[]);
        for (i, item) in self.structured_data.iter().enumerate() {
            rules.scope(&format!("structuredData[{}]", i), |r| {
                if r.required_str("type", item.schema_type.as_deref()) {
                    r.one_of("type", item.schema_type.as_deref(), SCHEMA_TYPES);
                }
                r.json("data", item.data.as_deref());
            });
        }
        if let Some(twitter) = &self.twitter {
            rules.scope("twitter", |r| {
                r.one_of("card", twitter.card.as_deref(), TWITTER_CARDS);
            });
        }
    }
}
