//! Redirect resolution
//!
//! A redirect applies to a request when its `source` equals the request path,
//! it is active, and its expiry date (if any) has not passed. Among several
//! matches the highest priority wins; equal priorities fall back to the
//! ascending `source` order.
//!
//! Usage counters on the document are never written here.

use chrono::{DateTime, NaiveTime, Utc};
use std::cmp::Ordering;

use crate::client::{ContentClient, FetchMode};
use crate::query::catalog;
use crate::schema::{Redirect, RedirectStatus};

/// Where to send a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectMatch {
    pub destination: String,
    pub status: RedirectStatus,
}

impl From<&Redirect> for RedirectMatch {
    fn from(redirect: &Redirect) -> Self {
        Self {
            destination: redirect.destination.clone(),
            status: redirect.status(),
        }
    }
}

/// Whether `redirect` may be applied at `now`
///
/// An expiry date is taken as midnight UTC of that day; the redirect is live
/// strictly before it.
pub fn is_eligible(redirect: &Redirect, now: DateTime<Utc>) -> bool {
    if !redirect.is_active() {
        return false;
    }
    match redirect.expiry_date {
        Some(date) => date.and_time(NaiveTime::MIN).and_utc() > now,
        None => true,
    }
}

/// Order of preference: priority descending, then source ascending
fn preference(a: &Redirect, b: &Redirect) -> Ordering {
    b.priority()
        .cmp(&a.priority())
        .then_with(|| a.source.cmp(&b.source))
}

/// Pick the redirect for `path` out of `redirects`
pub fn select<'a>(redirects: &'a [Redirect], path: &str, now: DateTime<Utc>) -> Option<&'a Redirect> {
    redirects
        .iter()
        .filter(|r| r.source == path && is_eligible(r, now))
        .min_by(|a, b| preference(a, b))
}

/// Resolves request paths against the redirects in the content store
#[derive(Clone)]
pub struct RedirectResolver {
    client: ContentClient,
}

impl RedirectResolver {
    pub fn new(client: ContentClient) -> Self {
        Self { client }
    }

    /// Match `path` against every live redirect
    ///
    /// The list is one cached published query shared by all paths, so
    /// eligibility is checked again here at request time. A failed fetch is
    /// logged and treated as "no redirect".
    pub async fn resolve(&self, path: &str) -> Option<RedirectMatch> {
        self.resolve_at(path, Utc::now()).await
    }

    pub async fn resolve_at(&self, path: &str, now: DateTime<Utc>) -> Option<RedirectMatch> {
        let redirects: Vec<Redirect> = match self
            .client
            .fetch(&catalog::active_redirects(), FetchMode::Published)
            .await
        {
            Ok(redirects) => redirects,
            Err(e) => {
                tracing::warn!("Failed to fetch redirects: {}", e);
                return None;
            }
        };
        let found = select(&redirects, path, now).map(RedirectMatch::from);
        if let Some(found) = &found {
            tracing::debug!(
                "Redirect {} -> {} ({})",
                path,
                found.destination,
                found.status.code()
            );
        }
        found
    }

    /// Ask the store for the redirect of exactly `path`
    ///
    /// Unlike [`resolve`](Self::resolve) this is one query per path and
    /// errors are returned to the caller.
    pub async fn lookup(&self, path: &str, mode: FetchMode) -> crate::Result<Option<Redirect>> {
        let found: Option<Redirect> = self
            .client
            .fetch_one(&catalog::redirect_by_path(path), mode)
            .await?;
        Ok(found.filter(|r| is_eligible(r, Utc::now())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemorySource;
    use crate::config::SiteConfig;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn redirect(source: &str, destination: &str, priority: i64) -> Redirect {
        Redirect {
            priority: Some(priority),
            is_active: Some(true),
            ..Redirect::new(source, destination)
        }
    }

    #[test]
    fn test_expired_never_returned() {
        let mut expired = redirect("/old", "/expired", 100);
        expired.expiry_date = NaiveDate::from_ymd_opt(2025, 2, 28);
        let mut today = redirect("/old", "/today", 90);
        today.expiry_date = NaiveDate::from_ymd_opt(2025, 3, 1);
        let mut later = redirect("/old", "/later", 10);
        later.expiry_date = NaiveDate::from_ymd_opt(2025, 3, 2);

        assert!(!is_eligible(&expired, now()));
        assert!(!is_eligible(&today, now()));
        assert!(is_eligible(&later, now()));

        let redirects = vec![expired, today, later];
        let found = select(&redirects, "/old", now()).unwrap();
        assert_eq!(found.destination, "/later");
    }

    #[test]
    fn test_inactive_skipped() {
        let mut off = redirect("/a", "/off", 100);
        off.is_active = Some(false);
        let on = redirect("/a", "/on", 0);
        let redirects = vec![off, on];
        assert_eq!(select(&redirects, "/a", now()).unwrap().destination, "/on");
    }

    #[test]
    fn test_unset_active_flag_not_eligible() {
        let unset = Redirect {
            priority: Some(50),
            ..Redirect::new("/a", "/unset")
        };
        assert!(!is_eligible(&unset, now()));

        let redirects = vec![unset, redirect("/a", "/on", 0)];
        assert_eq!(select(&redirects, "/a", now()).unwrap().destination, "/on");
    }

    #[test]
    fn test_priority_and_tie_break() {
        let redirects = vec![
            redirect("/a", "/low", 10),
            redirect("/a", "/high-2", 50),
            redirect("/a", "/high-1", 50),
            redirect("/b", "/other", 99),
        ];
        let found = select(&redirects, "/a", now()).unwrap();
        assert_eq!(found.priority(), 50);

        let a = redirect("/a", "/x", 50);
        let b = redirect("/b", "/y", 50);
        assert_eq!(preference(&a, &b), Ordering::Less);
        assert_eq!(preference(&b, &a), Ordering::Greater);
        assert_eq!(
            preference(&redirect("/z", "/", 60), &a),
            Ordering::Less
        );

        assert!(select(&redirects, "/missing", now()).is_none());
    }

    fn resolver(docs: Vec<serde_json::Value>) -> RedirectResolver {
        let source = MemorySource::new(docs).at(now());
        let client = ContentClient::new(Arc::new(source), &SiteConfig::default());
        RedirectResolver::new(client)
    }

    #[tokio::test]
    async fn test_resolver() {
        let resolver = resolver(vec![
            json!({"_id": "r1", "_type": "redirect", "source": "/old", "destination": "/new",
                   "type": "308", "isActive": true, "priority": 5}),
            json!({"_id": "r2", "_type": "redirect", "source": "/old", "destination": "/gone",
                   "type": "301", "isActive": true, "priority": 80, "expiryDate": "2025-01-01"}),
        ]);
        let found = resolver.resolve_at("/old", now()).await.unwrap();
        assert_eq!(
            found,
            RedirectMatch {
                destination: "/new".to_string(),
                status: RedirectStatus::PermanentRedirect,
            }
        );
        assert!(resolver.resolve_at("/new", now()).await.is_none());

        let direct = resolver
            .lookup("/old", FetchMode::Published)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(direct.destination, "/new");
    }
}
