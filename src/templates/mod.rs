//! HTML page shell
//!
//! Pages are assembled from pre-rendered pieces: the `<head>` block from the
//! SEO resolver, navigation menus, and the document body.

use crate::helpers::{html_escape, link_to};
use crate::schema::{NavLink, Navigation};

/// Everything needed to render one page
#[derive(Debug, Default)]
pub struct PageView<'a> {
    /// Rendered `<head>` contents, including JSON-LD scripts
    pub head: String,
    pub site_name: &'a str,
    pub navigation: Option<&'a Navigation>,
    pub title: &'a str,
    /// Line under the title (date, reading time)
    pub byline: Option<String>,
    pub body_html: String,
    pub draft: bool,
    /// Studio link for the document being previewed
    pub edit_url: Option<&'a str>,
}

fn render_menu(links: &[NavLink], class: &str) -> String {
    if links.is_empty() {
        return String::new();
    }
    let mut out = format!(r#"<ul class="{}">"#, class);
    for link in links {
        out.push_str("<li>");
        out.push_str(&link_to(
            &link.target.href(),
            &link.title,
            link.target.opens_in_new_tab(),
        ));
        out.push_str(&render_menu(&link.children, "submenu"));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

fn render_header(view: &PageView<'_>) -> String {
    let mut out = String::from("<header>");
    out.push_str(&link_to("/", view.site_name, false));
    if let Some(nav) = view.navigation {
        out.push_str("<nav>");
        out.push_str(&render_menu(&nav.main_menu, "menu"));
        out.push_str("</nav>");
    }
    out.push_str("</header>");
    out
}

fn render_footer(view: &PageView<'_>) -> String {
    let mut out = String::from("<footer>");
    if let Some(nav) = view.navigation {
        out.push_str(&render_menu(&nav.footer_menu, "footer-menu"));
    }
    out.push_str("</footer>");
    out
}

fn render_draft_banner(view: &PageView<'_>) -> String {
    if !view.draft {
        return String::new();
    }
    let mut out = String::from(r#"<div class="draft-banner">Draft mode"#);
    if let Some(edit_url) = view.edit_url {
        out.push(' ');
        out.push_str(&link_to(edit_url, "Edit", true));
    }
    out.push(' ');
    out.push_str(&link_to("/api/draft-mode/disable", "Exit", false));
    out.push_str("</div>");
    out
}

/// Render a full HTML document
pub fn render_page(view: &PageView<'_>) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<link rel=\"icon\" href=\"/icon\">\n");
    html.push_str("<link rel=\"apple-touch-icon\" href=\"/apple-icon\">\n");
    html.push_str("<link rel=\"manifest\" href=\"/manifest.webmanifest\">\n");
    html.push_str(&view.head);
    html.push_str("\n</head>\n<body>\n");
    html.push_str(&render_draft_banner(view));
    html.push_str(&render_header(view));
    html.push_str("\n<main>\n<article>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(view.title)));
    if let Some(byline) = &view.byline {
        html.push_str(&format!(
            "<p class=\"byline\">{}</p>\n",
            html_escape(byline)
        ));
    }
    html.push_str(&view.body_html);
    html.push_str("\n</article>\n</main>\n");
    html.push_str(&render_footer(view));
    html.push_str("\n</body>\n</html>\n");
    html
}
