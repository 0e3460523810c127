//! Generated icons and social images
//!
//! Each image is an SVG document of a fixed pixel size. When the settings
//! provide artwork it is embedded by URL; otherwise the site's initial or
//! name and description are drawn as text.

use super::{FALLBACK_DESCRIPTION, FALLBACK_NAME, FALLBACK_SHORT_NAME};
use crate::helpers::{escape_xml, Fit, ImageUrlBuilder};
use crate::schema::{Image, SiteSettings};

pub const CONTENT_TYPE: &str = "image/svg+xml";

const FONT: &str = "system-ui, -apple-system, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Icon,
    AppleIcon,
    OpenGraph,
    Twitter,
}

impl ImageKind {
    pub const ALL: [ImageKind; 4] = [
        ImageKind::Icon,
        ImageKind::AppleIcon,
        ImageKind::OpenGraph,
        ImageKind::Twitter,
    ];

    pub fn size(self) -> (u32, u32) {
        match self {
            ImageKind::Icon => (32, 32),
            ImageKind::AppleIcon => (180, 180),
            ImageKind::OpenGraph => (1200, 630),
            ImageKind::Twitter => (1200, 600),
        }
    }

    /// Route the image is served at
    pub fn route(self) -> &'static str {
        match self {
            ImageKind::Icon => "/icon",
            ImageKind::AppleIcon => "/apple-icon",
            ImageKind::OpenGraph => "/opengraph-image",
            ImageKind::Twitter => "/twitter-image",
        }
    }

    /// File name used when exporting
    pub fn file_name(self) -> &'static str {
        match self {
            ImageKind::Icon => "icon.svg",
            ImageKind::AppleIcon => "apple-icon.svg",
            ImageKind::OpenGraph => "opengraph-image.svg",
            ImageKind::Twitter => "twitter-image.svg",
        }
    }
}

/// SVG document under construction
struct Svg {
    width: u32,
    height: u32,
    body: String,
}

impl Svg {
    fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            body: String::new(),
        }
    }

    fn gradient(&mut self, from: &str, to: &str) -> &mut Self {
        self.body.push_str(&format!(
            r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="{}"/><stop offset="100%" stop-color="{}"/></linearGradient></defs>"#,
            from, to
        ));
        self.background("url(#bg)", 0.0)
    }

    fn background(&mut self, fill: &str, radius: f32) -> &mut Self {
        self.body.push_str(&format!(
            r#"<rect width="{}" height="{}" rx="{}" fill="{}"/>"#,
            self.width, self.height, radius, fill
        ));
        self
    }

    fn image(
        &mut self,
        href: &str,
        alt: &str,
        (x, y): (u32, u32),
        (w, h): (u32, u32),
        cover: bool,
    ) -> &mut Self {
        self.body.push_str(&format!(
            r#"<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="{}"><title>{}</title></image>"#,
            escape_xml(href),
            x,
            y,
            w,
            h,
            if cover { "xMidYMid slice" } else { "xMidYMid meet" },
            escape_xml(alt)
        ));
        self
    }

    fn text(
        &mut self,
        content: &str,
        y: u32,
        size: u32,
        bold: bool,
        fill: &str,
        opacity: f32,
    ) -> &mut Self {
        self.body.push_str(&format!(
            r#"<text x="50%" y="{}" text-anchor="middle" dominant-baseline="middle" font-family="{}" font-size="{}" font-weight="{}" fill="{}" opacity="{}">{}</text>"#,
            y,
            FONT,
            size,
            if bold { "bold" } else { "normal" },
            fill,
            opacity,
            escape_xml(content)
        ));
        self
    }

    fn finish(&self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| FALLBACK_SHORT_NAME[..1].to_string())
}

fn fitted(
    images: &ImageUrlBuilder,
    image: Option<&Image>,
    (w, h): (u32, u32),
    fit: Fit,
) -> Option<String> {
    image.and_then(|img| {
        images
            .image(img)
            .width(w)
            .height(h)
            .fit(fit)
            .auto_format()
            .url()
    })
}

/// Render the image of `kind`
pub fn render(
    kind: ImageKind,
    settings: Option<&SiteSettings>,
    images: &ImageUrlBuilder,
) -> String {
    match kind {
        ImageKind::Icon => icon(settings, images),
        ImageKind::AppleIcon => apple_icon(settings, images),
        ImageKind::OpenGraph => social(
            kind,
            settings,
            images,
            &Social {
                from: "#667eea",
                to: "#764ba2",
                logo: 150,
                title_size: 72,
                fallback_title_size: 80,
            },
        ),
        ImageKind::Twitter => social(
            kind,
            settings,
            images,
            &Social {
                from: "#1DA1F2",
                to: "#0d8bd9",
                logo: 120,
                title_size: 64,
                fallback_title_size: 64,
            },
        ),
    }
}

fn icon(settings: Option<&SiteSettings>, images: &ImageUrlBuilder) -> String {
    let size = ImageKind::Icon.size();
    let mut svg = Svg::new(size);
    svg.background("black", 6.4);
    let Some(settings) = settings else {
        svg.text("S", 17, 20, false, "white", 1.0);
        return svg.finish();
    };

    let name = settings.name().unwrap_or(FALLBACK_SHORT_NAME);
    let art = fitted(images, settings.favicon.as_ref(), size, Fit::Max)
        .or_else(|| fitted(images, settings.logo.as_ref(), size, Fit::Max));
    match art {
        Some(url) => svg.image(&url, name, (2, 2), (28, 28), false),
        None => svg.text(&initial(name), 17, 20, false, "white", 1.0),
    };
    svg.finish()
}

fn apple_icon(settings: Option<&SiteSettings>, images: &ImageUrlBuilder) -> String {
    let size = ImageKind::AppleIcon.size();
    let mut svg = Svg::new(size);
    svg.background("#ffffff", 0.0);
    let Some(settings) = settings else {
        svg.text("S", 92, 48, true, "#000", 1.0);
        return svg.finish();
    };

    let name = settings.name().unwrap_or(FALLBACK_SHORT_NAME);
    match fitted(images, settings.logo.as_ref(), size, Fit::Max) {
        Some(url) => svg.image(&url, name, (10, 10), (160, 160), false),
        None => svg.text(&initial(name), 92, 72, true, "#000", 1.0),
    };
    svg.finish()
}

/// Look of a social sharing image
struct Social {
    from: &'static str,
    to: &'static str,
    logo: u32,
    title_size: u32,
    fallback_title_size: u32,
}

fn social(
    kind: ImageKind,
    settings: Option<&SiteSettings>,
    images: &ImageUrlBuilder,
    look: &Social,
) -> String {
    let (width, height) = kind.size();
    let mut svg = Svg::new((width, height));
    let middle = height / 2;

    let Some(settings) = settings else {
        svg.gradient(look.from, look.to)
            .text(
                FALLBACK_NAME,
                middle - 30,
                look.fallback_title_size,
                true,
                "white",
                1.0,
            )
            .text(FALLBACK_DESCRIPTION, middle + 40, 32, false, "white", 0.9);
        return svg.finish();
    };

    let name = settings.name().unwrap_or(FALLBACK_NAME);
    let description = settings.description().unwrap_or(FALLBACK_DESCRIPTION);
    let cover = fitted(
        images,
        settings.default_seo.as_ref().and_then(|s| s.image.as_ref()),
        (width, height),
        Fit::Crop,
    );
    if let Some(url) = cover {
        svg.image(&url, name, (0, 0), (width, height), true);
        return svg.finish();
    }

    svg.gradient(look.from, look.to);
    let logo = fitted(images, settings.logo.as_ref(), (200, 200), Fit::Max);
    let title_y = if let Some(url) = logo {
        let top = middle - look.logo - 20;
        svg.image(
            &url,
            name,
            ((width - look.logo) / 2, top),
            (look.logo, look.logo),
            false,
        );
        middle + 20
    } else {
        middle - 30
    };
    svg.text(name, title_y, look.title_size, true, "white", 1.0)
        .text(description, title_y + 70, 32, false, "white", 0.9);
    svg.finish()
}
