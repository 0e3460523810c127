//! Navigation menus
//!
//! In the store a menu link is a flat object whose `type` field decides which
//! of `internalLink`, `externalUrl`, `email` or `phone` is meaningful. Here
//! that choice is made once, when the link is deserialized, and the result is
//! a [`LinkTarget`] variant carrying only the fields of its kind.

use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

use super::common::{nullable, Slug};
use super::rules::{Document, Issue, Rules};

/// Site navigation document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Navigation {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub main_menu: Vec<NavLink>,
    #[serde(deserialize_with = "nullable")]
    pub footer_menu: Vec<NavLink>,
}

/// A menu entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLink", into = "RawLink")]
pub struct NavLink {
    pub key: Option<String>,
    pub title: String,
    pub target: LinkTarget,
    /// Only main-menu entries carry sub-items
    pub children: Vec<NavLink>,
}

/// Where a menu entry points
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    Internal {
        page: InternalRef,
        open_in_new_tab: bool,
    },
    External {
        url: String,
        open_in_new_tab: bool,
    },
    Email {
        address: String,
    },
    Phone {
        number: String,
    },
}

/// A page or post reference, possibly already dereferenced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InternalRef {
    #[serde(rename = "_ref", alias = "_id")]
    pub id: Option<String>,
    /// `page` or `post` once dereferenced, `reference` otherwise
    #[serde(rename = "_type")]
    pub doc_type: Option<String>,
    pub slug: Option<Slug>,
}

impl LinkTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            LinkTarget::Internal { .. } => "internal",
            LinkTarget::External { .. } => "external",
            LinkTarget::Email { .. } => "email",
            LinkTarget::Phone { .. } => "phone",
        }
    }

    /// The `href` for this target
    ///
    /// Internal links that were not dereferenced have no path and yield `#`.
    pub fn href(&self) -> String {
        match self {
            LinkTarget::Internal { page, .. } => match &page.slug {
                Some(slug) if slug.is_root() => "/".to_string(),
                Some(slug) if !slug.is_empty() => {
                    if page.doc_type.as_deref() == Some("post") {
                        format!("/blog/{}", slug.as_str())
                    } else {
                        format!("/{}", slug.as_str())
                    }
                }
                _ => "#".to_string(),
            },
            LinkTarget::External { url, .. } => url.clone(),
            LinkTarget::Email { address } => format!("mailto:{}", address),
            LinkTarget::Phone { number } => {
                let digits: String = number.chars().filter(|c| !c.is_whitespace()).collect();
                format!("tel:{}", digits)
            }
        }
    }

    pub fn opens_in_new_tab(&self) -> bool {
        match self {
            LinkTarget::Internal {
                open_in_new_tab, ..
            }
            | LinkTarget::External {
                open_in_new_tab, ..
            } => *open_in_new_tab,
            _ => false,
        }
    }
}

/// Wire form of a menu entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawLink {
    #[serde(rename = "_key", skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    title: Option<String>,
    #[serde(rename = "type")]
    link_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    internal_link: Option<InternalRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_in_new_tab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub_items: Option<Vec<NavLink>>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<RawLink> for NavLink {
    type Error = String;

    fn try_from(raw: RawLink) -> Result<Self, Self::Error> {
        let title = present(raw.title).ok_or_else(|| "Title is required".to_string())?;
        let open_in_new_tab = raw.open_in_new_tab.unwrap_or(false);

        let target = match raw.link_type.as_deref().unwrap_or("internal") {
            "internal" => LinkTarget::Internal {
                page: raw
                    .internal_link
                    .filter(|r| r.id.is_some() || r.slug.is_some())
                    .ok_or_else(|| "Please select a page for internal links".to_string())?,
                open_in_new_tab,
            },
            "external" => {
                let url = present(raw.external_url)
                    .ok_or_else(|| "Please provide a URL for external links".to_string())?;
                if url::Url::parse(&url).is_err() {
                    return Err("Please provide a valid URL".to_string());
                }
                LinkTarget::External {
                    url,
                    open_in_new_tab,
                }
            }
            "email" => LinkTarget::Email {
                address: present(raw.email)
                    .ok_or_else(|| "Please provide an email address".to_string())?,
            },
            "phone" => LinkTarget::Phone {
                number: present(raw.phone)
                    .ok_or_else(|| "Please provide a phone number".to_string())?,
            },
            other => return Err(format!("Unknown link type: {}", other)),
        };

        Ok(NavLink {
            key: raw.key,
            title,
            target,
            children: raw.sub_items.unwrap_or_default(),
        })
    }
}

impl From<NavLink> for RawLink {
    fn from(link: NavLink) -> Self {
        let mut raw = RawLink {
            key: link.key,
            title: Some(link.title),
            link_type: Some(link.target.kind().to_string()),
            sub_items: if link.children.is_empty() {
                None
            } else {
                Some(link.children)
            },
            ..Default::default()
        };
        match link.target {
            LinkTarget::Internal {
                page,
                open_in_new_tab,
            } => {
                raw.internal_link = Some(page);
                raw.open_in_new_tab = Some(open_in_new_tab);
            }
            LinkTarget::External {
                url,
                open_in_new_tab,
            } => {
                raw.external_url = Some(url);
                raw.open_in_new_tab = Some(open_in_new_tab);
            }
            LinkTarget::Email { address } => raw.email = Some(address),
            LinkTarget::Phone { number } => raw.phone = Some(number),
        }
        raw
    }
}

impl Document for Navigation {
    const TYPE: &'static str = "navigation";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        for (i, item) in self.main_menu.iter().enumerate() {
            for (j, sub) in item.children.iter().enumerate() {
                if !sub.children.is_empty() {
                    rules.error(
                        &format!("mainMenu[{}].subItems[{}]", i, j),
                        "Sub-menu items cannot be nested",
                    );
                }
            }
        }
        for (i, item) in self.footer_menu.iter().enumerate() {
            if !item.children.is_empty() {
                rules.error(
                    &format!("footerMenu[{}]", i),
                    "Footer items cannot have sub-menu items",
                );
            }
        }
        rules.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<NavLink, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_internal_link_dereferenced() {
        let link = parse(
            r#"{"_key":"a","title":"About","type":"internal",
                "internalLink":{"_id":"p1","_type":"page","slug":"about"},
                "externalUrl":"https://ignored.test"}"#,
        )
        .unwrap();
        assert_eq!(link.target.kind(), "internal");
        assert_eq!(link.target.href(), "/about");
        assert!(!link.target.opens_in_new_tab());
    }

    #[test]
    fn test_post_link_and_unresolved_ref() {
        let post = parse(
            r#"{"title":"News","internalLink":{"_id":"x","_type":"post","slug":{"current":"launch"}}}"#,
        )
        .unwrap();
        assert_eq!(post.target.href(), "/blog/launch");

        let raw_ref =
            parse(r#"{"title":"Ref","internalLink":{"_ref":"p9","_type":"reference"}}"#).unwrap();
        assert_eq!(raw_ref.target.href(), "#");
    }

    #[test]
    fn test_email_and_phone() {
        let email = parse(r#"{"title":"Mail","type":"email","email":"hi@acme.test"}"#).unwrap();
        assert_eq!(email.target.href(), "mailto:hi@acme.test");

        let phone = parse(
            r#"{"title":"Call","type":"phone","phone":"+1 555 0100","openInNewTab":true}"#,
        )
        .unwrap();
        assert_eq!(phone.target.href(), "tel:+15550100");
        assert!(!phone.target.opens_in_new_tab());
    }

    #[test]
    fn test_missing_target_fails_construction() {
        let err = parse(r#"{"title":"Broken","type":"external"}"#).unwrap_err();
        assert!(err
            .to_string()
            .contains("Please provide a URL for external links"));

        let err = parse(r#"{"title":"Broken","type":"external","externalUrl":"nope"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Please provide a valid URL"));

        let err = parse(r#"{"title":"Broken","type":"internal"}"#).unwrap_err();
        assert!(err
            .to_string()
            .contains("Please select a page for internal links"));
    }

    #[test]
    fn test_navigation_with_sub_items() {
        let nav: Navigation = serde_json::from_str(
            r#"{"_id":"navigation","mainMenu":[{"title":"Company","type":"external",
                "externalUrl":"https://acme.test","openInNewTab":true,
                "subItems":[{"title":"Email us","type":"email","email":"a@b.test"}]}],
                "footerMenu":null}"#,
        )
        .unwrap();
        assert_eq!(nav.main_menu.len(), 1);
        assert!(nav.main_menu[0].target.opens_in_new_tab());
        assert_eq!(nav.main_menu[0].children.len(), 1);
        assert!(nav.footer_menu.is_empty());
        assert!(nav.validate().is_empty());
    }

    #[test]
    fn test_round_trip_keeps_variant_fields_only() {
        let link = parse(r#"{"title":"Mail","type":"email","email":"hi@acme.test"}"#).unwrap();
        let value = serde_json::to_value(&link).unwrap();
        assert_eq!(value["type"], "email");
        assert!(value.get("externalUrl").is_none());
        assert!(value.get("openInNewTab").is_none());
    }
}
