//! JSON-LD structured data

use serde_json::{json, Map, Value};

use super::metadata::{
    document_url, site_url, SeoContext, SeoSource, FALLBACK_SITE_DESCRIPTION, FALLBACK_SITE_TITLE,
};
use crate::schema::{SiteSettings, StructuredDataItem};

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Merge editor-supplied fragments into one object
///
/// Fragments are applied in order, later keys overwriting earlier ones.
/// Anything that is not a JSON object is skipped.
pub fn merge_fragments(items: &[StructuredDataItem]) -> Map<String, Value> {
    let mut merged = Map::new();
    for item in items {
        let Some(data) = item.data.as_deref() else {
            continue;
        };
        match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(fields)) => merged.extend(fields),
            Ok(_) => tracing::warn!(
                "Skipping structured data {:?}: not a JSON object",
                item.key.as_deref().unwrap_or("")
            ),
            Err(e) => tracing::warn!(
                "Skipping structured data {:?}: {}",
                item.key.as_deref().unwrap_or(""),
                e
            ),
        }
    }
    merged
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        map.insert(key.to_string(), Value::String(value.to_string()));
    }
}

/// `WebPage` description of a document
pub fn web_page<D: SeoSource + ?Sized>(
    doc: &D,
    settings: Option<&SiteSettings>,
    ctx: &SeoContext<'_>,
) -> Value {
    let url = document_url(doc, site_url(settings, ctx));
    let seo = doc.seo();

    let mut data = Map::new();
    data.insert("@context".to_string(), json!(SCHEMA_CONTEXT));
    data.insert("@type".to_string(), json!("WebPage"));
    data.insert("name".to_string(), json!(doc.title()));
    insert_opt(
        &mut data,
        "description",
        doc.summary()
            .filter(|s| !s.is_empty())
            .or_else(|| seo.and_then(|s| s.description.as_deref())),
    );
    data.insert("url".to_string(), json!(url));
    let image = doc.image().and_then(|img| ctx.images.image(img).url());
    insert_opt(&mut data, "image", image.as_deref());
    insert_opt(&mut data, "datePublished", doc.published());
    insert_opt(&mut data, "dateModified", doc.modified());

    if let Some(seo) = seo {
        data.extend(merge_fragments(&seo.structured_data));
    }
    Value::Object(data)
}

/// Site-wide description: an `Organization` when settings exist, a bare
/// `WebSite` otherwise
pub fn organization(settings: Option<&SiteSettings>, ctx: &SeoContext<'_>) -> Value {
    let Some(settings) = settings else {
        return json!({
            "@context": SCHEMA_CONTEXT,
            "@type": "WebSite",
            "name": FALLBACK_SITE_TITLE,
            "description": FALLBACK_SITE_DESCRIPTION,
            "url": ctx.site_url,
        });
    };

    let mut data = Map::new();
    data.insert("@context".to_string(), json!(SCHEMA_CONTEXT));
    data.insert("@type".to_string(), json!("Organization"));
    data.insert("name".to_string(), json!(settings.site_name));
    data.insert("description".to_string(), json!(settings.site_description));
    data.insert("url".to_string(), json!(site_url(Some(settings), ctx)));
    let logo = settings
        .logo
        .as_ref()
        .and_then(|img| ctx.images.image(img).url());
    insert_opt(&mut data, "logo", logo.as_deref());

    if let Some(contact) = &settings.contact_info {
        let mut point = Map::new();
        point.insert("@type".to_string(), json!("ContactPoint"));
        insert_opt(&mut point, "email", contact.email.as_deref());
        insert_opt(&mut point, "telephone", contact.phone.as_deref());
        insert_opt(&mut point, "address", contact.address.as_deref());
        data.insert("contactPoint".to_string(), Value::Object(point));
    }

    if let Some(seo) = &settings.default_seo {
        data.extend(merge_fragments(&seo.structured_data));
    }
    Value::Object(data)
}

/// Serialize for embedding in an HTML `<script>` element
///
/// `<` is escaped so the payload can never close the element.
pub fn script_tag(data: &Value) -> String {
    let json = serde_json::to_string(data)
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c");
    format!(r#"<script type="application/ld+json">{}</script>"#, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::ImageUrlBuilder;
    use crate::schema::{ContactInfo, Page, Seo, Slug};

    #[test]
    fn test_merge_fragments() {
        let items = vec![
            StructuredDataItem::new("Article", r#"{"a": 1}"#),
            StructuredDataItem::new("Article", "not json"),
            StructuredDataItem::new("Article", "[1, 2]"),
            StructuredDataItem::new("Article", r#"{"a": 2, "b": 3}"#),
        ];
        let merged = merge_fragments(&items);
        assert_eq!(Value::Object(merged), json!({"a": 2, "b": 3}));
    }

    #[test]
    fn test_web_page() {
        let images = ImageUrlBuilder::new("proj", "production");
        let ctx = SeoContext {
            site_url: "https://acme.test",
            images: &images,
        };
        let page = Page {
            title: "Pricing".to_string(),
            slug: Some(Slug::new("pricing")),
            publish_date: Some("2024-01-01T00:00:00Z".to_string()),
            seo: Some(Seo {
                description: Some("Plans and prices".to_string()),
                structured_data: vec![StructuredDataItem::new(
                    "Product",
                    r#"{"@type": "Product", "offers": 3}"#,
                )],
                ..Default::default()
            }),
            ..Default::default()
        };
        let data = web_page(&page, None, &ctx);
        assert_eq!(data["@type"], "Product");
        assert_eq!(data["name"], "Pricing");
        assert_eq!(data["description"], "Plans and prices");
        assert_eq!(data["url"], "https://acme.test/pricing");
        assert_eq!(data["datePublished"], "2024-01-01T00:00:00Z");
        assert_eq!(data["offers"], 3);
        assert!(data.get("dateModified").is_none());
        assert!(data.get("image").is_none());
    }

    #[test]
    fn test_organization() {
        let images = ImageUrlBuilder::new("proj", "production");
        let ctx = SeoContext {
            site_url: "https://fallback.test",
            images: &images,
        };
        let fallback = organization(None, &ctx);
        assert_eq!(fallback["@type"], "WebSite");
        assert_eq!(fallback["url"], "https://fallback.test");

        let settings = SiteSettings {
            site_name: "Acme".to_string(),
            site_description: "Things".to_string(),
            contact_info: Some(ContactInfo {
                email: Some("hi@acme.test".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let org = organization(Some(&settings), &ctx);
        assert_eq!(org["@type"], "Organization");
        assert_eq!(org["url"], "https://fallback.test");
        assert_eq!(
            org["contactPoint"],
            json!({"@type": "ContactPoint", "email": "hi@acme.test"})
        );
    }

    #[test]
    fn test_script_tag_escapes() {
        let tag = script_tag(&json!({"name": "</script><b>"}));
        assert_eq!(
            tag,
            r#"<script type="application/ld+json">{"name":"\u003c/script>\u003cb>"}</script>"#
        );
    }
}
