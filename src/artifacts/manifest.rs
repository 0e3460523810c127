//! Web app manifest

use serde::Serialize;

use super::{FALLBACK_DESCRIPTION, FALLBACK_NAME, FALLBACK_SHORT_NAME};
use crate::helpers::{Fit, ImageUrlBuilder};
use crate::schema::SiteSettings;

const BACKGROUND_COLOR: &str = "#ffffff";
const THEME_COLOR: &str = "#000000";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ManifestIcon {
    fn new(src: &str, sizes: &str, mime_type: &str) -> Self {
        Self {
            src: src.to_string(),
            sizes: sizes.to_string(),
            mime_type: mime_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Initials of each word, upper-cased
///
/// # Examples
/// ```ignore
/// short_name("acme rocket co") // -> "ARC"
/// ```
pub fn short_name(name: &str) -> String {
    let initials: String = name
        .split(' ')
        .filter_map(|word| word.chars().next())
        .collect::<String>()
        .to_uppercase();
    if initials.is_empty() {
        FALLBACK_SHORT_NAME.to_string()
    } else {
        initials
    }
}

fn default_icon() -> ManifestIcon {
    ManifestIcon::new("/icon", "any", "image/svg+xml")
}

pub fn manifest(settings: Option<&SiteSettings>, images: &ImageUrlBuilder) -> WebManifest {
    let Some(settings) = settings else {
        return WebManifest {
            name: FALLBACK_NAME.to_string(),
            short_name: FALLBACK_SHORT_NAME.to_string(),
            description: FALLBACK_DESCRIPTION.to_string(),
            start_url: "/".to_string(),
            display: "standalone".to_string(),
            background_color: BACKGROUND_COLOR.to_string(),
            theme_color: THEME_COLOR.to_string(),
            icons: vec![default_icon()],
            scope: None,
        };
    };

    let name = settings.name().unwrap_or(FALLBACK_NAME);
    let icon_url = settings
        .favicon
        .as_ref()
        .or(settings.logo.as_ref())
        .and_then(|img| {
            images
                .image(img)
                .width(512)
                .height(512)
                .fit(Fit::Max)
                .auto_format()
                .url()
        });
    let icons = match icon_url {
        Some(src) => vec![
            ManifestIcon::new(&src, "192x192", "image/png"),
            ManifestIcon::new(&src, "512x512", "image/png"),
        ],
        None => vec![default_icon()],
    };

    WebManifest {
        name: name.to_string(),
        short_name: short_name(name),
        description: settings
            .description()
            .unwrap_or(FALLBACK_DESCRIPTION)
            .to_string(),
        start_url: "/".to_string(),
        display: "standalone".to_string(),
        background_color: BACKGROUND_COLOR.to_string(),
        theme_color: THEME_COLOR.to_string(),
        icons,
        scope: settings.url().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Image, ImageAsset};

    #[test]
    fn test_short_name() {
        assert_eq!(short_name("acme rocket co"), "ARC");
        assert_eq!(short_name("Acme  Co"), "AC");
        assert_eq!(short_name(""), "Site");
    }

    #[test]
    fn test_fallback_manifest() {
        let images = ImageUrlBuilder::new("proj", "production");
        let manifest = manifest(None, &images);
        assert_eq!(manifest.name, "My Site");
        assert_eq!(manifest.short_name, "Site");
        assert_eq!(manifest.icons, vec![default_icon()]);

        let json = serde_json::to_value(&manifest).unwrap();
        assert!(json.get("scope").is_none());
        assert_eq!(json["icons"][0]["type"], "image/svg+xml");
    }

    #[test]
    fn test_manifest_icons_prefer_favicon() {
        let images = ImageUrlBuilder::new("proj", "production");
        let image = |id: &str| Image {
            asset: Some(ImageAsset {
                id: Some(id.to_string()),
                url: None,
            }),
            ..Default::default()
        };
        let settings = SiteSettings {
            site_name: "Acme Co".to_string(),
            site_url: Some("https://acme.test".to_string()),
            logo: Some(image("image-logo-100x100-png")),
            favicon: Some(image("image-fav-64x64-png")),
            ..Default::default()
        };
        let manifest = manifest(Some(&settings), &images);
        assert_eq!(manifest.short_name, "AC");
        assert_eq!(manifest.scope.as_deref(), Some("https://acme.test"));
        assert_eq!(manifest.icons.len(), 2);
        assert_eq!(
            manifest.icons[0].src,
            "https://cdn.sanity.io/images/proj/production/fav-64x64.png?w=512&h=512&fit=max&auto=format"
        );
        assert_eq!(manifest.description, FALLBACK_DESCRIPTION);
    }
}
