//! URL redirect documents

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::nullable;
use super::rules::{Document, Issue, Rules};

/// HTTP status used for a redirect, stored as its code string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedirectStatus {
    #[default]
    #[serde(rename = "301")]
    MovedPermanently,
    #[serde(rename = "302")]
    Found,
    #[serde(rename = "307")]
    TemporaryRedirect,
    #[serde(rename = "308")]
    PermanentRedirect,
}

impl RedirectStatus {
    pub fn code(self) -> u16 {
        match self {
            RedirectStatus::MovedPermanently => 301,
            RedirectStatus::Found => 302,
            RedirectStatus::TemporaryRedirect => 307,
            RedirectStatus::PermanentRedirect => 308,
        }
    }

    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            RedirectStatus::MovedPermanently | RedirectStatus::PermanentRedirect
        )
    }
}

/// A path redirect managed by editors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Redirect {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub source: String,
    #[serde(deserialize_with = "nullable")]
    pub destination: String,
    #[serde(rename = "type")]
    pub status: Option<RedirectStatus>,
    pub is_active: Option<bool>,
    /// 0..=100, higher wins
    pub priority: Option<i64>,
    pub description: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    /// Usage counters exist in the schema but are never written by this crate
    pub redirect_count: Option<u64>,
    pub last_used: Option<DateTime<Utc>>,
}

impl Redirect {
    pub fn new(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            ..Default::default()
        }
    }

    pub fn status(&self) -> RedirectStatus {
        self.status.unwrap_or_default()
    }

    /// Only redirects switched on explicitly are active
    pub fn is_active(&self) -> bool {
        self.is_active == Some(true)
    }

    pub fn priority(&self) -> i64 {
        self.priority.unwrap_or(0)
    }

    pub fn is_external(&self) -> bool {
        self.destination.starts_with("http")
    }
}

impl Document for Redirect {
    const TYPE: &'static str = "redirect";

    fn validate(&self) -> Vec<Issue> {
        let mut rules = Rules::new();
        if rules.required_str("source", Some(&self.source)) && !self.source.starts_with('/') {
            rules.error("source", "Source URL must start with \"/\"");
        }
        if rules.required_str("destination", Some(&self.destination))
            && !self.destination.starts_with('/')
            && !self.destination.starts_with("http")
        {
            rules.error(
                "destination",
                "Destination URL must start with \"/\" for internal paths or \"http\" for external URLs",
            );
        }
        rules.range("priority", self.priority, 0, 100);
        rules.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_redirect() {
        let redirect: Redirect = serde_json::from_str(
            r#"{"_id":"r1","source":"/old","destination":"https://new.test","type":"308",
                "isActive":true,"priority":10,"expiryDate":"2030-01-31"}"#,
        )
        .unwrap();
        assert_eq!(redirect.status().code(), 308);
        assert!(redirect.status().is_permanent());
        assert!(redirect.is_external());
        assert_eq!(
            redirect.expiry_date,
            Some(NaiveDate::from_ymd_opt(2030, 1, 31).unwrap())
        );
    }

    #[test]
    fn test_defaults() {
        let redirect: Redirect =
            serde_json::from_str(r#"{"source":"/a","destination":"/b"}"#).unwrap();
        assert_eq!(redirect.status(), RedirectStatus::MovedPermanently);
        assert!(!redirect.is_active());
        assert_eq!(redirect.priority(), 0);
        assert!(redirect.validate().is_empty());
    }

    #[test]
    fn test_validation() {
        let mut redirect = Redirect::new("old", "ftp://x");
        redirect.priority = Some(101);
        let fields: Vec<_> = redirect.validate().into_iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["source", "destination", "priority"]);
    }
}
