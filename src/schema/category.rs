//! Category documents

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::common::{Reference, Slug};
use super::rules::{Document, Issue, Rules, Severity};
use super::seo::Seo;

lazy_static! {
    static ref HEX_COLOR_RE: Regex = Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("valid color regex");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<Slug>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    /// Nested categories point at their parent
    pub parent_category: Option<Reference>,
    pub featured: Option<bool>,
    pub is_active: Option<bool>,
    pub seo: Option<Seo>,
}

impl Category {
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

impl Document for Category {
    const TYPE: &'static str = "category";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        rules.required_str("title", self.title.as_deref());
        rules.required_str("slug", self.slug.as_ref().map(Slug::as_str));
        rules.pattern(
            "color",
            self.color.as_deref(),
            &HEX_COLOR_RE,
            Severity::Warning,
            "Please provide a valid hex color code",
        );
        if let (Some(parent), false) = (&self.parent_category, self.id.is_empty()) {
            if parent.id == self.id {
                rules.error("parentCategory", "A category cannot be its own parent");
            }
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
    use crate::schema::rules::has_errors;

    #[test]
    fn test_color_is_case_insensitive_warning() {
        let mut category = Category {
            id: "c1".to_string(),
            title: Some("Rust".to_string()),
            slug: Some(Slug::new("rust")),
            color: Some("#ff00AA".to_string()),
            ..Default::default()
        };
        assert!(category.validate().is_empty());

        category.color = Some("red".to_string());
        let issues = category.validate();
        assert_eq!(issues.len(), 1);
        assert!(!has_errors(&issues));
    }

    #[test]
    fn test_self_parent() {
        let category = Category {
            id: "c1".to_string(),
            title: Some("Rust".to_string()),
            slug: Some(Slug::new("rust")),
            parent_category: Some(Reference {
                id: "c1".to_string(),
            }),
            ..Default::default()
        };
        assert!(has_errors(&category.validate()));
    }
}
