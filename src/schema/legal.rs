//! Legal documents (privacy policy, terms, ...)

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{nullable, Slug};
use super::rules::{Document, Issue, Rules};
use super::seo::Seo;

pub const LEGAL_TYPES: &[&str] = &[
    "privacy-policy",
    "terms-of-service",
    "cookie-policy",
    "disclaimer",
    "gdpr-compliance",
    "refund-policy",
    "shipping-policy",
    "custom",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Legal {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    pub slug: Option<Slug>,
    pub legal_type: Option<String>,
    pub summary: Option<String>,
    /// YYYY-MM-DD
    pub effective_date: Option<String>,
    pub last_updated: Option<String>,
    pub jurisdiction: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub content: Vec<Value>,
    #[serde(deserialize_with = "nullable")]
    pub sections: Vec<LegalSection>,
    pub seo: Option<Seo>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegalSection {
    #[serde(rename = "_key")]
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub content: Vec<Value>,
}

impl Legal {
    pub fn legal_type(&self) -> &str {
        self.legal_type.as_deref().unwrap_or("custom")
    }

    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }

    /// "privacy-policy" -> "Privacy Policy"
    pub fn type_label(&self) -> String {
        self.legal_type()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Document for Legal {
    const TYPE: &'static str = "legal";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        rules.required_str("title", Some(&self.title));
        rules.required_str("slug", self.slug.as_ref().map(Slug::as_str));
        if rules.required_str("legalType", self.legal_type.as_deref()) {
            rules.one_of("legalType", self.legal_type.as_deref(), LEGAL_TYPES);
        }
        if rules.required_str("effectiveDate", self.effective_date.as_deref()) {
            rules.date("effectiveDate", self.effective_date.as_deref());
        }
        rules.date("lastUpdated", self.last_updated.as_deref());
        rules.min_items("content", &self.content, 1);
        for (i, section) in self.sections.iter().enumerate() {
            rules.scope(&format!("sections[{}]", i), |r| {
                r.required_str("title", section.title.as_deref());
                r.min_items("content", &section.content, 1);
            });
        }
        if let Some(seo) = &self.seo {
            rules.scope("seo", |r| seo.check(r));
        }
        rules.finish()
    }
}
