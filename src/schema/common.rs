//! Field types shared across documents

use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize `null` as the type's default
///
/// Projections return `null` for absent fields, so list-valued fields
/// must accept it.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// URL path segment of a document
///
/// Accepts both the stored object form (`{"current": "about"}`) and the
/// flattened string form produced by projections like `"slug": slug.current`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slug {
    pub current: String,
}

impl<'de> Deserialize<'de> for Slug {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Plain(String),
            Object {
                #[serde(default)]
                current: Option<String>,
            },
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Plain(current) => Slug { current },
            Repr::Object { current } => Slug {
                current: current.unwrap_or_default(),
            },
        })
    }
}

impl Slug {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }

    /// Generate a slug from a source field such as the title
    pub fn from_source(source: &str) -> Self {
        Self::new(slug::slugify(source))
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.trim().is_empty()
    }

    /// The site root is stored as `/`
    pub fn is_root(&self) -> bool {
        self.current == "/"
    }
}

/// Reference to another document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref", alias = "_id")]
    pub id: String,
}

/// Image asset pointer, either a raw reference or a resolved asset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    #[serde(rename = "_ref", alias = "_id", default)]
    pub id: Option<String>,
    /// Present when the asset was dereferenced or rewritten for preview
    #[serde(default)]
    pub url: Option<String>,
}

/// Focal point of an image, as fractions of its size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
}

/// Crop insets, as fractions of the image size
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// An image field with editorial metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub asset: Option<ImageAsset>,
    pub hotspot: Option<Hotspot>,
    pub crop: Option<Crop>,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

impl Image {
    /// Asset reference id, if any
    pub fn asset_id(&self) -> Option<&str> {
        self.asset.as_ref().and_then(|a| a.id.as_deref())
    }
}

/// Link to a social profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLink {
    #[serde(rename = "_key")]
    pub key: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
}
