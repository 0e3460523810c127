//! Page documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{nullable, Image, Slug};
use super::rules::{Document, Issue, Rules};
use super::seo::Seo;

/// Layout templates a page may choose
pub const PAGE_TEMPLATES: &[&str] = &["default", "full-width", "sidebar", "landing"];

/// What kind of page this is; drives sitemap weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    #[default]
    Standard,
    Homepage,
    Contact,
    About,
    Services,
    Custom,
    /// Any value the schema does not list
    #[serde(other)]
    Unknown,
}

/// A standalone content page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    pub slug: Option<Slug>,
    pub page_type: Option<PageType>,
    pub excerpt: Option<String>,
    pub template: Option<String>,
    pub is_published: Option<bool>,
    /// Raw datetime string as stored
    pub publish_date: Option<String>,
    pub last_modified: Option<String>,
    pub show_in_navigation: Option<bool>,
    pub navigation_title: Option<String>,
    pub featured_image: Option<Image>,
    /// Rich content blocks, passed through untouched
    #[serde(deserialize_with = "nullable")]
    pub body: Vec<Value>,
    pub seo: Option<Seo>,
}

impl Page {
    pub fn page_type(&self) -> PageType {
        self.page_type.unwrap_or_default()
    }

    /// Pages start out unpublished
    pub fn is_published(&self) -> bool {
        self.is_published == Some(true)
    }

    pub fn shows_in_navigation(&self) -> bool {
        self.show_in_navigation.unwrap_or(true)
    }

    /// Title used in navigation menus
    pub fn navigation_title(&self) -> &str {
        self.navigation_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }
}

impl Document for Page {
    const TYPE: &'static str = "page";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        rules.required_str("title", Some(&self.title));
        rules.required_str("slug", self.slug.as_ref().map(Slug::as_str));
        if rules.required("pageType", self.page_type.as_ref())
            && self.page_type == Some(PageType::Unknown)
        {
            rules.error("pageType", "Unknown page type");
        }
        rules.one_of("template", self.template.as_deref(), PAGE_TEMPLATES);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_projection() {
        let page: Page = serde_json::from_str(
            r#"{"_id":"p1","_type":"page","title":"About us",
                "slug":{"_type":"about","current":"about","source":"about"},
                "pageType":"about","excerpt":null,"template":null,"isPublished":null,
                "publishDate":"2024-03-01T10:00:00Z","lastModified":null,
                "showInNavigation":null,"navigationTitle":null,"featuredImage":null,
                "body":null,"seo":null}"#,
        )
        .unwrap();
        assert_eq!(page.page_type(), PageType::About);
        assert!(!page.is_published());
        assert!(page.shows_in_navigation());
        assert_eq!(page.navigation_title(), "About us");
        assert!(page.body.is_empty());
    }

    #[test]
    fn test_unknown_page_type() {
        let page: Page = serde_json::from_str(r#"{"pageType":"landing-v2"}"#).unwrap();
        assert_eq!(page.page_type(), PageType::Unknown);
    }

    #[test]
    fn test_validate_page() {
        let page = Page {
            title: "Contact".to_string(),
            slug: Some(Slug::new("contact")),
            page_type: Some(PageType::Contact),
            template: Some("two-column".to_string()),
            featured_image: Some(Image::default()),
            ..Default::default()
        };
        let fields: Vec<_> = page.validate().into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["template", "featuredImage.alt"]);
    }

    #[test]
    fn test_validate_missing_required() {
        let fields: Vec<_> = Page::default()
            .validate()
            .into_iter()
            .map(|i| i.field)
            .collect();
        assert_eq!(fields, vec!["title", "slug", "pageType"]);
    }
}
