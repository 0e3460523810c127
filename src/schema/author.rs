//! Author documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{nullable, Image, Slug, SocialLink};
use super::rules::{Document, Issue, Rules, Severity};
use super::seo::Seo;
use super::settings::check_social_links;

pub const AUTHOR_SOCIAL_PLATFORMS: &[&str] = &[
    "twitter",
    "linkedin",
    "github",
    "website",
    "instagram",
    "facebook",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub slug: Option<Slug>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub extended_bio: Vec<Value>,
    pub image: Option<Image>,
    #[serde(deserialize_with = "nullable")]
    pub social_links: Vec<SocialLink>,
    #[serde(deserialize_with = "nullable")]
    pub expertise: Vec<String>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
    pub seo: Option<Seo>,
}

impl Author {
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(true)
    }
}

impl Document for Author {
    const TYPE: &'static str = "author";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        rules.required_str("name", Some(&self.name));
        rules.required_str("slug", self.slug.as_ref().map(Slug::as_str));
        rules.required_str("firstName", self.first_name.as_deref());
        rules.required_str("lastName", self.last_name.as_deref());
        if rules.required_str("email", self.email.as_deref()) {
            rules.email("email", self.email.as_deref());
        }
        rules.max_chars(
            "bio",
            self.bio.as_deref(),
            200,
            Severity::Error,
            "Must be at most 200 characters long",
        );
        if let Some(image) = &self.image {
            rules.scope("image", |r| {
                r.required_str("alt", image.alt.as_deref());
            });
        }
        check_social_links(&mut rules, &self.social_links, AUTHOR_SOCIAL_PLATFORMS);
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
    fn test_author_rules() {
        let author = Author {
            name: "Ada Lovelace".to_string(),
            slug: Some(Slug::from_source("Ada Lovelace")),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada-at-example".to_string()),
            social_links: vec![SocialLink {
                key: None,
                platform: Some("website".to_string()),
                url: Some("https://ada.test".to_string()),
            }],
            ..Default::default()
        };
        let fields: Vec<_> = author.validate().into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["email"]);
        assert!(author.is_active());
    }
}
