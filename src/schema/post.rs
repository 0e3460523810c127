//! Blog post documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{nullable, Image, Reference, Slug};
use super::rules::{Document, Issue, Rules, Severity};
use super::seo::Seo;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    pub slug: Option<Slug>,
    pub excerpt: Option<String>,
    pub author: Option<Reference>,
    #[serde(deserialize_with = "nullable")]
    pub categories: Vec<Reference>,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    pub featured_image: Option<Image>,
    /// Minutes
    pub reading_time: Option<i64>,
    pub published_at: Option<String>,
    pub is_published: Option<bool>,
    pub featured: Option<bool>,
    pub seo: Option<Seo>,
    #[serde(deserialize_with = "nullable")]
    pub body: Vec<Value>,
    pub last_modified: Option<String>,
}

impl Post {
    /// Posts start out unpublished
    pub fn is_published(&self) -> bool {
        self.is_published.unwrap_or(false)
    }

    pub fn reading_time(&self) -> i64 {
        self.reading_time.unwrap_or(5)
    }
}

impl Document for Post {
    const TYPE: &'static str = "post";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        rules.required_str("title", Some(&self.title));
        rules.required_str("slug", self.slug.as_ref().map(Slug::as_str));
        if rules.required_str("excerpt", self.excerpt.as_deref()) {
            rules.max_chars(
                "excerpt",
                self.excerpt.as_deref(),
                300,
                Severity::Error,
                "Must be at most 300 characters long",
            );
        }
        rules.required("author", self.author.as_ref());
        rules.min_items("categories", &self.categories, 1);
        rules.range("readingTime", self.reading_time, 1, 60);
        rules.required_str("publishedAt", self.published_at.as_deref());
        rules.min_items("body", &self.body, 1);
        if let Some(image) = &self.featured_image {
            rules.scope("featuredImage", |r| {
                r.required_str("alt", image.alt.as_deref());
            });
        }
        if let Some(seo) = &self.seo {
            rules.scope("seo", |r| seo.check(r));
        }
        rules.finish()
    }
}
