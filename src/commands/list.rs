//! List site content

use anyhow::Result;
use serde_json::Value;

use crate::client::FetchMode;
use crate::query::catalog;
use crate::Site;

/// Store `_type` for a CLI type name
pub fn resolve_type(name: &str) -> &str {
    match name {
        "page" | "pages" => "page",
        "post" | "posts" => "post",
        "author" | "authors" => "author",
        "category" | "categories" => "category",
        "legal" => "legal",
        "redirect" | "redirects" => "redirect",
        "settings" => "siteSettings",
        "nav" | "navigation" => "navigation",
        other => other,
    }
}

fn text<'a>(doc: &'a Value, pointer: &str) -> Option<&'a str> {
    doc.pointer(pointer).and_then(Value::as_str)
}

/// One listing line for a document
pub fn summarize(doc: &Value) -> String {
    let id = text(doc, "/_id").unwrap_or("?");
    if text(doc, "/_type") == Some("redirect") {
        return format!(
            "  {} -> {} [{}]",
            text(doc, "/source").unwrap_or(""),
            text(doc, "/destination").unwrap_or(""),
            id
        );
    }

    let label = text(doc, "/title")
        .or_else(|| text(doc, "/name"))
        .or_else(|| text(doc, "/siteName"))
        .unwrap_or("(untitled)");
    match text(doc, "/slug/current") {
        Some(slug) => format!("  {} - /{} [{}]", label, slug.trim_start_matches('/'), id),
        None => format!("  {} [{}]", label, id),
    }
}

/// List published documents of one type
pub async fn run(site: &Site, content_type: &str) -> Result<()> {
    let doc_type = resolve_type(content_type);
    let docs: Vec<Value> = site
        .client
        .fetch(&catalog::documents_of_type(doc_type), FetchMode::Published)
        .await?;

    println!("{} ({}):", doc_type, docs.len());
    for doc in &docs {
        println!("{}", summarize(doc));
    }
    Ok(())
}
