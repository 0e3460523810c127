//! Sitemap generation

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::client::{ContentClient, FetchMode};
use crate::error::Result;
use crate::helpers::{date_xml, escape_xml, parse_datetime};
use crate::query::catalog;
use crate::schema::PageType;

/// Site URL used when settings carry none
pub const FALLBACK_SITE_URL: &str = "https://example.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

/// A page as returned by the sitemap query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SitemapPage {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: Option<String>,
    pub page_type: Option<PageType>,
    pub last_modified: Option<String>,
    pub publish_date: Option<String>,
    pub seo: Option<SitemapSeo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SitemapSeo {
    pub no_index: Option<bool>,
}

impl SitemapPage {
    fn is_excluded(&self) -> bool {
        self.seo.as_ref().and_then(|s| s.no_index) == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Change frequency and priority for a page type
pub fn classify(page_type: PageType) -> (ChangeFrequency, f32) {
    match page_type {
        PageType::Homepage => (ChangeFrequency::Daily, 1.0),
        PageType::About => (ChangeFrequency::Monthly, 0.8),
        PageType::Services => (ChangeFrequency::Weekly, 0.8),
        PageType::Contact => (ChangeFrequency::Monthly, 0.6),
        _ => (ChangeFrequency::Monthly, 0.5),
    }
}

/// The root entry followed by one entry per indexable page
pub fn build_entries(site_url: &str, pages: &[SitemapPage], now: DateTime<Utc>) -> Vec<SitemapEntry> {
    let site_url = site_url.trim_end_matches('/');
    let mut entries = vec![SitemapEntry {
        url: site_url.to_string(),
        last_modified: now,
        change_frequency: ChangeFrequency::Daily,
        priority: 1.0,
    }];

    for page in pages {
        if page.is_excluded() {
            continue;
        }
        let Some(slug) = page.slug.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        let path = if slug == "/" {
            String::new()
        } else {
            format!("/{}", slug)
        };
        let last_modified = page
            .last_modified
            .as_deref()
            .and_then(parse_datetime)
            .or_else(|| page.publish_date.as_deref().and_then(parse_datetime))
            .unwrap_or(now);
        let (change_frequency, priority) = classify(page.page_type.unwrap_or_default());
        entries.push(SitemapEntry {
            url: format!("{}{}", site_url, path),
            last_modified,
            change_frequency,
            priority,
        });
    }
    entries
}

/// Fetch settings and pages and build the sitemap
///
/// Without a settings document the sitemap is empty.
pub async fn generate(client: &ContentClient, now: DateTime<Utc>) -> Result<Vec<SitemapEntry>> {
    let Some(settings) = client.site_settings(FetchMode::Published).await else {
        tracing::warn!("No site settings, sitemap is empty");
        return Ok(Vec::new());
    };
    let site_url = settings.url().unwrap_or(FALLBACK_SITE_URL);
    let pages: Vec<SitemapPage> = client
        .fetch(&catalog::sitemap_pages(), FetchMode::Published)
        .await?;
    Ok(build_entries(site_url, &pages, now))
}

/// Render entries as a sitemap XML document
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            date_xml(&entry.last_modified)
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.change_frequency.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemorySource;
    use crate::config::SiteConfig;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Arc;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn page(slug: &str, page_type: PageType) -> SitemapPage {
        SitemapPage {
            id: slug.to_string(),
            slug: Some(slug.to_string()),
            page_type: Some(page_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_index_excluded() {
        let mut hidden = page("secret", PageType::Standard);
        hidden.seo = Some(SitemapSeo {
            no_index: Some(true),
        });
        let mut shown = page("about", PageType::About);
        shown.seo = Some(SitemapSeo {
            no_index: Some(false),
        });
        let entries = build_entries("https://acme.test/", &[hidden, shown], now());
        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://acme.test", "https://acme.test/about"]);
        assert_eq!(entries[1].priority, 0.8);
        assert_eq!(entries[1].change_frequency, ChangeFrequency::Monthly);
    }

    #[test]
    fn test_last_modified_fallbacks() {
        let mut modified = page("a", PageType::Standard);
        modified.last_modified = Some("2024-06-01T08:00:00Z".to_string());
        modified.publish_date = Some("2024-01-01T00:00:00Z".to_string());
        let mut published = page("b", PageType::Standard);
        published.publish_date = Some("2024-01-01T00:00:00Z".to_string());
        let bare = page("c", PageType::Standard);
        let mut garbled = page("d", PageType::Standard);
        garbled.last_modified = Some("last tuesday".to_string());
        garbled.publish_date = Some("2024-02-01T00:00:00Z".to_string());

        let entries = build_entries(
            "https://acme.test",
            &[modified, published, bare, garbled],
            now(),
        );
        assert_eq!(
            entries[1].last_modified,
            Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(
            entries[2].last_modified,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(entries[3].last_modified, now());
        assert_eq!(
            entries[4].last_modified,
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(PageType::Homepage), (ChangeFrequency::Daily, 1.0));
        assert_eq!(classify(PageType::Services), (ChangeFrequency::Weekly, 0.8));
        assert_eq!(classify(PageType::Contact), (ChangeFrequency::Monthly, 0.6));
        assert_eq!(classify(PageType::Custom), (ChangeFrequency::Monthly, 0.5));
    }

    #[test]
    fn test_home_slug_maps_to_root() {
        let entries = build_entries("https://acme.test", &[page("/", PageType::Homepage)], now());
        assert_eq!(entries[1].url, "https://acme.test");
    }

    #[test]
    fn test_render_xml() {
        let entries = vec![SitemapEntry {
            url: "https://acme.test/a&b".to_string(),
            last_modified: now(),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        }];
        let xml = render_xml(&entries);
        assert!(xml.contains("<loc>https://acme.test/a&amp;b</loc>"));
        assert!(xml.contains("<lastmod>2025-03-01T12:00:00.000Z</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.8</priority>"));
    }

    #[tokio::test]
    async fn test_generate() {
        let make = |docs| {
            let source = MemorySource::new(docs).at(now());
            ContentClient::new(Arc::new(source), &SiteConfig::default())
        };

        let empty = make(vec![json!({"_id": "p1", "_type": "page", "isPublished": true,
                                     "slug": {"current": "about"}})]);
        assert!(generate(&empty, now()).await.unwrap().is_empty());

        let client = make(vec![
            json!({"_id": "s", "_type": "siteSettings", "siteName": "Acme"}),
            json!({"_id": "p1", "_type": "page", "isPublished": true,
                   "slug": {"current": "about"}, "pageType": "about"}),
            json!({"_id": "p2", "_type": "page", "isPublished": true,
                   "slug": {"current": "hidden"}, "seo": {"noIndex": true}}),
        ]);
        let entries = generate(&client, now()).await.unwrap();
        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com", "https://example.com/about"]);
    }
}
