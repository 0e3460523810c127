//! `<head>` rendering

use super::metadata::Metadata;
use crate::helpers::{html_escape, join};

fn meta_name(out: &mut Vec<String>, name: &str, content: &str) {
    out.push(format!(
        r#"<meta name="{}" content="{}">"#,
        name,
        html_escape(content)
    ));
}

fn meta_property(out: &mut Vec<String>, property: &str, content: &str) {
    out.push(format!(
        r#"<meta property="{}" content="{}">"#,
        property,
        html_escape(content)
    ));
}

/// Absolute form of a possibly site-relative URL
fn absolute(base: &str, url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        join(base, url)
    }
}

/// Render metadata as `<head>` elements, one per line
pub fn render_head(meta: &Metadata) -> String {
    let mut out = Vec::new();
    out.push(format!("<title>{}</title>", html_escape(meta.title.text())));
    if let Some(description) = &meta.description {
        meta_name(&mut out, "description", description);
    }
    if let Some(canonical) = &meta.canonical {
        out.push(format!(
            r#"<link rel="canonical" href="{}">"#,
            html_escape(&absolute(&meta.base_url, canonical))
        ));
    }
    if let Some(robots) = &meta.robots {
        meta_name(&mut out, "robots", &robots.content());
    }

    if let Some(og) = &meta.open_graph {
        meta_property(&mut out, "og:type", &og.og_type);
        meta_property(&mut out, "og:locale", &og.locale);
        if let Some(site_name) = &og.site_name {
            meta_property(&mut out, "og:site_name", site_name);
        }
        meta_property(&mut out, "og:title", &og.title);
        if let Some(description) = &og.description {
            meta_property(&mut out, "og:description", description);
        }
        meta_property(&mut out, "og:url", &absolute(&meta.base_url, &og.url));
        for image in &og.images {
            meta_property(&mut out, "og:image", &image.url);
            meta_property(&mut out, "og:image:width", &image.width.to_string());
            meta_property(&mut out, "og:image:height", &image.height.to_string());
            meta_property(&mut out, "og:image:alt", &image.alt);
        }
    }

    if let Some(twitter) = &meta.twitter {
        meta_name(&mut out, "twitter:card", &twitter.card);
        if let Some(site) = &twitter.site {
            meta_name(&mut out, "twitter:site", site);
        }
        if let Some(creator) = &twitter.creator {
            meta_name(&mut out, "twitter:creator", creator);
        }
        meta_name(&mut out, "twitter:title", &twitter.title);
        if let Some(description) = &twitter.description {
            meta_name(&mut out, "twitter:description", description);
        }
        for image in &twitter.images {
            meta_name(&mut out, "twitter:image", image);
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seo::metadata::{Robots, Title};

    #[test]
    fn test_render_head() {
        let meta = Metadata {
            base_url: "https://acme.test".to_string(),
            title: Title::Plain("Tom & Jerry".to_string()),
            description: Some("A \"classic\"".to_string()),
            canonical: Some("/cartoons".to_string()),
            robots: Some(Robots {
                index: false,
                follow: true,
            }),
            open_graph: None,
            twitter: None,
        };
        let head = render_head(&meta);
        let lines: Vec<&str> = head.lines().collect();
        assert_eq!(
            lines,
            vec![
                "<title>Tom &amp; Jerry</title>",
                r#"<meta name="description" content="A &quot;classic&quot;">"#,
                r#"<link rel="canonical" href="https://acme.test/cartoons">"#,
                r#"<meta name="robots" content="noindex, follow">"#,
            ]
        );
    }
}
