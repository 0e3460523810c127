//! robots.txt policy

use serde::Serialize;

use crate::schema::SiteSettings;
use crate::sitemap::FALLBACK_SITE_URL;

/// Paths crawlers are kept out of
pub const DISALLOWED: &[&str] = &["/api/", "/studio/", "/admin/"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotsRule {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RobotsPolicy {
    pub rules: Vec<RobotsRule>,
    pub sitemap: String,
}

/// Policy for the site; without settings everything is allowed
pub fn policy(settings: Option<&SiteSettings>) -> RobotsPolicy {
    let Some(settings) = settings else {
        return RobotsPolicy {
            rules: vec![RobotsRule {
                user_agent: "*".to_string(),
                allow: vec!["/".to_string()],
                disallow: Vec::new(),
            }],
            sitemap: format!("{}/sitemap.xml", FALLBACK_SITE_URL),
        };
    };

    let site_url = settings.url().unwrap_or(FALLBACK_SITE_URL);
    RobotsPolicy {
        rules: vec![RobotsRule {
            user_agent: "*".to_string(),
            allow: vec!["/".to_string()],
            disallow: DISALLOWED.iter().map(|p| p.to_string()).collect(),
        }],
        sitemap: format!("{}/sitemap.xml", site_url.trim_end_matches('/')),
    }
}

impl RobotsPolicy {
    pub fn to_txt(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(&format!("User-Agent: {}\n", rule.user_agent));
            for path in &rule.allow {
                out.push_str(&format!("Allow: {}\n", path));
            }
            for path in &rule.disallow {
                out.push_str(&format!("Disallow: {}\n", path));
            }
            out.push('\n');
        }
        out.push_str(&format!("Sitemap: {}\n", self.sitemap));
        out
    }
}
