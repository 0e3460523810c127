//! Image URL builder for asset references
//!
//! Asset references look like `image-<id>-<width>x<height>-<format>`. The
//! builder turns one into a CDN URL and appends transformation parameters;
//! the transformation itself happens on the CDN.

use crate::schema::Image;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// How the CDN fits an image into the requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    Clip,
    Crop,
    Fill,
    Max,
    Min,
    Scale,
}

impl Fit {
    fn as_str(self) -> &'static str {
        match self {
            Fit::Clip => "clip",
            Fit::Crop => "crop",
            Fit::Fill => "fill",
            Fit::Max => "max",
            Fit::Min => "min",
            Fit::Scale => "scale",
        }
    }
}

/// A parsed asset reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl AssetRef {
    pub fn parse(reference: &str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let (rest, format) = rest.rsplit_once('-')?;
        let (id, dims) = rest.rsplit_once('-')?;
        let (w, h) = dims.split_once('x')?;
        Some(Self {
            id: id.to_string(),
            width: w.parse().ok()?,
            height: h.parse().ok()?,
            format: format.to_string(),
        })
    }

    fn file_name(&self) -> String {
        format!("{}-{}x{}.{}", self.id, self.width, self.height, self.format)
    }
}

/// Builds URLs for one project and dataset
#[derive(Debug, Clone)]
pub struct ImageUrlBuilder {
    project_id: String,
    dataset: String,
}

impl ImageUrlBuilder {
    pub fn new(project_id: &str, dataset: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            dataset: dataset.to_string(),
        }
    }

    /// Start a URL for `image`
    pub fn image<'a>(&'a self, image: &'a Image) -> ImageUrl<'a> {
        ImageUrl {
            builder: self,
            image,
            width: None,
            height: None,
            fit: None,
            auto_format: false,
        }
    }

    /// Plain asset URL for a reference, without transformations
    pub fn asset_url(&self, reference: &str) -> Option<String> {
        AssetRef::parse(reference).map(|asset| {
            format!(
                "{}/{}/{}/{}",
                CDN_BASE,
                self.project_id,
                self.dataset,
                asset.file_name()
            )
        })
    }
}

/// A URL under construction
#[derive(Debug, Clone)]
pub struct ImageUrl<'a> {
    builder: &'a ImageUrlBuilder,
    image: &'a Image,
    width: Option<u32>,
    height: Option<u32>,
    fit: Option<Fit>,
    auto_format: bool,
}

impl<'a> ImageUrl<'a> {
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn fit(mut self, fit: Fit) -> Self {
        self.fit = Some(fit);
        self
    }

    pub fn auto_format(mut self) -> Self {
        self.auto_format = true;
        self
    }

    /// The final URL, or `None` when the image has no usable asset
    ///
    /// An asset that already carries a URL (dereferenced, or rewritten for
    /// preview) is used as the base instead of the CDN path.
    pub fn url(&self) -> Option<String> {
        let asset = self.image.asset.as_ref()?;
        let parsed = asset.id.as_deref().and_then(AssetRef::parse);
        let base = match (&asset.url, &parsed) {
            (Some(url), _) => url.clone(),
            (None, Some(r)) => format!(
                "{}/{}/{}/{}",
                CDN_BASE,
                self.builder.project_id,
                self.builder.dataset,
                r.file_name()
            ),
            (None, None) => return None,
        };

        let mut params: Vec<String> = Vec::new();
        if let (Some(r), Some(crop)) = (&parsed, &self.image.crop) {
            let (w, h) = (r.width as f64, r.height as f64);
            let left = (crop.left * w).round();
            let top = (crop.top * h).round();
            let width = (w - (crop.left + crop.right) * w).round();
            let height = (h - (crop.top + crop.bottom) * h).round();
            if left > 0.0 || top > 0.0 || width < w || height < h {
                params.push(format!("rect={},{},{},{}", left, top, width, height));
            }
        }
        if let (Some(hotspot), Some(_), Some(_)) = (&self.image.hotspot, self.width, self.height) {
            params.push(format!("fp-x={}", hotspot.x));
            params.push(format!("fp-y={}", hotspot.y));
        }
        if let Some(w) = self.width {
            params.push(format!("w={}", w));
        }
        if let Some(h) = self.height {
            params.push(format!("h={}", h));
        }
        if let Some(fit) = self.fit {
            params.push(format!("fit={}", fit.as_str()));
        }
        if self.auto_format {
            params.push("auto=format".to_string());
        }

        if params.is_empty() {
            Some(base)
        } else {
            let sep = if base.contains('?') { '&' } else { '?' };
            Some(format!("{}{}{}", base, sep, params.join("&")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Crop, Hotspot, ImageAsset};

    fn image(reference: &str) -> Image {
        Image {
            asset: Some(ImageAsset {
                id: Some(reference.to_string()),
                url: None,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_ref() {
        let r = AssetRef::parse("image-abc123-2000x1000-jpg").unwrap();
        assert_eq!(r.id, "abc123");
        assert_eq!((r.width, r.height), (2000, 1000));
        assert_eq!(r.format, "jpg");
        assert!(AssetRef::parse("file-abc-pdf").is_none());
    }

    #[test]
    fn test_plain_and_sized_url() {
        let builder = ImageUrlBuilder::new("proj", "production");
        let img = image("image-abc123-2000x1000-png");
        assert_eq!(
            builder.image(&img).url().unwrap(),
            "https://cdn.sanity.io/images/proj/production/abc123-2000x1000.png"
        );
        assert_eq!(
            builder.image(&img).width(512).fit(Fit::Max).auto_format().url().unwrap(),
            "https://cdn.sanity.io/images/proj/production/abc123-2000x1000.png?w=512&fit=max&auto=format"
        );
    }

    #[test]
    fn test_crop_and_hotspot() {
        let builder = ImageUrlBuilder::new("proj", "production");
        let mut img = image("image-abc-1000x500-jpg");
        img.crop = Some(Crop {
            top: 0.1,
            bottom: 0.1,
            left: 0.0,
            right: 0.5,
        });
        img.hotspot = Some(Hotspot {
            x: 0.25,
            y: 0.5,
            height: 0.3,
            width: 0.3,
        });
        assert_eq!(
            builder.image(&img).width(1200).height(630).url().unwrap(),
            "https://cdn.sanity.io/images/proj/production/abc-1000x500.jpg\
             ?rect=0,50,500,400&fp-x=0.25&fp-y=0.5&w=1200&h=630"
        );
    }

    #[test]
    fn test_missing_asset() {
        let builder = ImageUrlBuilder::new("proj", "production");
        assert!(builder.image(&Image::default()).url().is_none());
        assert!(builder.image(&image("not-a-ref")).url().is_none());
    }
}
