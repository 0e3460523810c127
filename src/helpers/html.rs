//! HTML and XML escaping helpers

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text for XML element content and attributes
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Generate an anchor tag
///
/// Links that open in a new tab get `rel="noopener noreferrer"`.
pub fn link_to(href: &str, text: &str, new_tab: bool) -> String {
    if new_tab {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            html_escape(href),
            html_escape(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), html_escape(text))
    }
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: Option<&str>, width: Option<u32>, height: Option<u32>) -> String {
    let size = match (width, height) {
        (Some(w), Some(h)) => format!(r#" width="{}" height="{}""#, w, h),
        _ => String::new(),
    };
    format!(
        r#"<img src="{}" alt="{}"{}>"#,
        html_escape(src),
        html_escape(alt.unwrap_or("")),
        size
    )
}

/// Plain text of portable-text blocks, one paragraph per block
pub fn blocks_to_html(blocks: &[serde_json::Value]) -> String {
    blocks
        .iter()
        .filter_map(|block| {
            let children = block.get("children")?.as_array()?;
            let text: String = children
                .iter()
                .filter_map(|span| span.get("text").and_then(|t| t.as_str()))
                .collect();
            if text.is_empty() {
                return None;
            }
            let tag = match block.get("style").and_then(|s| s.as_str()) {
                Some(style @ ("h1" | "h2" | "h3" | "h4" | "blockquote")) => style,
                _ => "p",
            };
            Some(format!("<{tag}>{}</{tag}>", html_escape(&text), tag = tag))
        })
        .collect::<Vec<_>>()
        .join("\n")
}
