//! Site settings singleton

use serde::{Deserialize, Serialize};

use super::common::{nullable, Image, SocialLink};
use super::rules::{Document, Issue, Rules};
use super::seo::Seo;

/// Platforms offered for site-wide social links
pub const SITE_SOCIAL_PLATFORMS: &[&str] = &[
    "twitter",
    "facebook",
    "instagram",
    "linkedin",
    "github",
    "youtube",
];

/// Global site configuration authored in the content store
///
/// Only the first instance returned by the store is ever used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub site_name: String,
    #[serde(deserialize_with = "nullable")]
    pub site_description: String,
    pub site_url: Option<String>,
    pub logo: Option<Image>,
    pub favicon: Option<Image>,
    #[serde(rename = "defaultSEO")]
    pub default_seo: Option<Seo>,
    #[serde(deserialize_with = "nullable")]
    pub social_links: Vec<SocialLink>,
    pub contact_info: Option<ContactInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl SiteSettings {
    /// Site name, or `None` when blank
    pub fn name(&self) -> Option<&str> {
        non_blank(&self.site_name)
    }

    pub fn description(&self) -> Option<&str> {
        non_blank(&self.site_description)
    }

    pub fn url(&self) -> Option<&str> {
        self.site_url.as_deref().and_then(non_blank)
    }
}

pub(crate) fn non_blank(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Shared rules for social link lists
pub(crate) fn check_social_links(rules: &mut Rules, links: &[SocialLink], platforms: &[&str]) {
    for (i, link) in links.iter().enumerate() {
        rules.scope(&format!("socialLinks[{}]", i), |r| {
            if r.required_str("platform", link.platform.as_deref()) {
                r.one_of("platform", link.platform.as_deref(), platforms);
            }
            if r.required_str("url", link.url.as_deref()) {
                r.url("url", link.url.as_deref(), &["http", "https"]);
            }
        });
    }
}

impl Document for SiteSettings {
    const TYPE: &'static str = "siteSettings";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        rules.required_str("siteName", Some(&self.site_name));
        rules.required_str("siteDescription", Some(&self.site_description));
        if rules.required_str("siteUrl", self.site_url.as_deref()) {
            rules.url("siteUrl", self.site_url.as_deref(), &["http", "https"]);
        }
        if let Some(logo) = &self.logo {
            rules.scope("logo", |r| {
                r.required_str("alt", logo.alt.as_deref());
            });
        }
        if let Some(seo) = &self.default_seo {
            rules.scope("defaultSEO", |r| seo.check(r));
        }
        check_social_links(&mut rules, &self.social_links, SITE_SOCIAL_PLATFORMS);
        if let Some(contact) = &self.contact_info {
            rules.scope("contactInfo", |r| r.email("email", contact.email.as_deref()));
        }
        rules.finish()
    }
}
