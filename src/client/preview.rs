//! Draft result overlay for live preview
//!
//! Draft reads are post-processed so a preview page can render images
//! without another round trip and can link each document back to its editor.

use serde_json::{Map, Value};

use crate::helpers::{encode_segment, ImageUrlBuilder};

/// Annotate a draft query result in place
///
/// * image asset references gain a direct `url`
/// * every document (an object with `_id` and `_type`) gains `_editUrl`
pub fn annotate(value: &mut Value, studio_url: &str, images: &ImageUrlBuilder) {
    match value {
        Value::Array(items) => {
            for item in items {
                annotate(item, studio_url, images);
            }
        }
        Value::Object(map) => {
            resolve_asset(map, images);
            if let Some(edit) = edit_url(map, studio_url) {
                map.insert("_editUrl".to_string(), Value::String(edit));
            }
            for (_, child) in map.iter_mut() {
                annotate(child, studio_url, images);
            }
        }
        _ => {}
    }
}

fn resolve_asset(map: &mut Map<String, Value>, images: &ImageUrlBuilder) {
    let Some(Value::Object(asset)) = map.get_mut("asset") else {
        return;
    };
    if asset.contains_key("url") {
        return;
    }
    let url = asset
        .get("_ref")
        .and_then(Value::as_str)
        .and_then(|r| images.asset_url(r));
    if let Some(url) = url {
        asset.insert("url".to_string(), Value::String(url));
    }
}

/// Studio intent link for a document
pub fn edit_url(map: &Map<String, Value>, studio_url: &str) -> Option<String> {
    let id = map.get("_id")?.as_str()?;
    let doc_type = map.get("_type")?.as_str()?;
    Some(format!(
        "{}/intent/edit/id={};type={}",
        studio_url.trim_end_matches('/'),
        encode_segment(id),
        encode_segment(doc_type)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotate() {
        let images = ImageUrlBuilder::new("proj", "production");
        let mut result = json!([{
            "_id": "p1",
            "_type": "page",
            "featuredImage": {"asset": {"_ref": "image-abc-10x20-png"}},
            "seo": {"image": {"asset": {"_ref": "file-xyz-pdf"}}}
        }]);
        annotate(&mut result, "/studio/", &images);

        let page = &result[0];
        assert_eq!(page["_editUrl"], "/studio/intent/edit/id=p1;type=page");
        assert_eq!(
            page["featuredImage"]["asset"]["url"],
            "https://cdn.sanity.io/images/proj/production/abc-10x20.png"
        );
        assert!(page["seo"]["image"]["asset"].get("url").is_none());
        assert!(page["featuredImage"].get("_editUrl").is_none());
    }

    #[test]
    fn test_scalars_untouched() {
        let images = ImageUrlBuilder::new("proj", "production");
        let mut value = json!(null);
        annotate(&mut value, "/studio", &images);
        assert!(value.is_null());
    }
}
