//! Page metadata resolution
//!
//! Every value is resolved along the same chain: the document's own SEO
//! override, then the document itself (title, excerpt, featured image), then
//! the site-wide default SEO and settings, then a hard-coded fallback.
//!
//! Robots flags are resolved differently for detail pages and the site
//! layout. A detail page is indexable unless `noIndex` is explicitly `true`;
//! the layout is indexable only when `noIndex` is explicitly `false`. Both
//! rules are kept as they are.

use serde::Serialize;

use crate::helpers::{page_url, ImageUrlBuilder};
use crate::schema::{
    Author, Category, Image, Legal, Page, Post, Seo, SiteSettings, TwitterSettings,
};

pub const FALLBACK_SITE_TITLE: &str = "Lakesite";
pub const FALLBACK_SITE_DESCRIPTION: &str =
    "CMS-driven websites powered by a headless content store";
pub const NOT_FOUND_TITLE: &str = "Page Not Found";
pub const NOT_FOUND_DESCRIPTION: &str = "The requested page could not be found.";

const DEFAULT_OG_TYPE: &str = "website";
const DEFAULT_LOCALE: &str = "en_US";
const DEFAULT_TWITTER_CARD: &str = "summary_large_image";

/// Open Graph image size
pub const OG_IMAGE_SIZE: (u32, u32) = (1200, 630);

/// Per-request inputs that do not come from the content store
#[derive(Clone, Copy)]
pub struct SeoContext<'a> {
    /// Configured site URL, used when settings carry none
    pub site_url: &'a str,
    pub images: &'a ImageUrlBuilder,
}

/// Document title, optionally with a template for child pages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Title {
    Plain(String),
    /// `template` contains `%s`, replaced by a child page's title
    Template { default: String, template: String },
}

impl Title {
    /// Title shown when no child title is given
    pub fn text(&self) -> &str {
        match self {
            Title::Plain(title) => title,
            Title::Template { default, .. } => default,
        }
    }

    /// Title for a child page under this one
    pub fn apply(&self, child: &str) -> String {
        match self {
            Title::Plain(_) => child.to_string(),
            Title::Template { template, .. } => template.replace("%s", child),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
}

impl Robots {
    /// Value of the robots meta tag
    pub fn content(&self) -> String {
        format!(
            "{}, {}",
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub og_type: String,
    pub locale: String,
    pub site_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub images: Vec<OgImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: String,
    pub site: Option<String>,
    pub creator: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub images: Vec<String>,
}

/// Resolved metadata for one page or for the layout around it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Base for relative URLs
    pub base_url: String,
    pub title: Title,
    pub description: Option<String>,
    pub canonical: Option<String>,
    pub robots: Option<Robots>,
    pub open_graph: Option<OpenGraph>,
    pub twitter: Option<TwitterCard>,
}

impl Metadata {
    /// Combine page metadata with the layout around it
    ///
    /// The page wins field by field. A layout title template is applied to
    /// the page title.
    pub fn within(self, layout: &Metadata) -> Metadata {
        Metadata {
            base_url: self.base_url,
            title: Title::Plain(layout.title.apply(self.title.text())),
            description: self.description.or_else(|| layout.description.clone()),
            canonical: self.canonical.or_else(|| layout.canonical.clone()),
            robots: self.robots.or(layout.robots),
            open_graph: self.open_graph.or_else(|| layout.open_graph.clone()),
            twitter: self.twitter.or_else(|| layout.twitter.clone()),
        }
    }
}

/// A document that can be turned into page metadata
pub trait SeoSource {
    fn title(&self) -> &str;
    fn slug(&self) -> Option<&str>;
    fn seo(&self) -> Option<&Seo>;
    /// Short description of the document (excerpt, bio, summary)
    fn summary(&self) -> Option<&str>;
    /// Main image, used when the SEO object has none
    fn image(&self) -> Option<&Image> {
        None
    }
    fn published(&self) -> Option<&str> {
        None
    }
    fn modified(&self) -> Option<&str> {
        None
    }
    /// Site-relative path for a slug
    fn path(&self, slug: &str) -> String {
        slug.to_string()
    }
    fn og_type(&self) -> &'static str {
        DEFAULT_OG_TYPE
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl SeoSource for Page {
    fn title(&self) -> &str {
        &self.title
    }
    fn slug(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.as_str())
    }
    fn seo(&self) -> Option<&Seo> {
        self.seo.as_ref()
    }
    fn summary(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }
    fn image(&self) -> Option<&Image> {
        self.featured_image.as_ref()
    }
    fn published(&self) -> Option<&str> {
        self.publish_date.as_deref()
    }
    fn modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }
}

impl SeoSource for Post {
    fn title(&self) -> &str {
        &self.title
    }
    fn slug(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.as_str())
    }
    fn seo(&self) -> Option<&Seo> {
        self.seo.as_ref()
    }
    fn summary(&self) -> Option<&str> {
        self.excerpt.as_deref()
    }
    fn image(&self) -> Option<&Image> {
        self.featured_image.as_ref()
    }
    fn published(&self) -> Option<&str> {
        self.published_at.as_deref()
    }
    fn modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }
    fn path(&self, slug: &str) -> String {
        format!("blog/{}", slug)
    }
    fn og_type(&self) -> &'static str {
        "article"
    }
}

impl SeoSource for Author {
    fn title(&self) -> &str {
        &self.name
    }
    fn slug(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.as_str())
    }
    fn seo(&self) -> Option<&Seo> {
        self.seo.as_ref()
    }
    fn summary(&self) -> Option<&str> {
        self.bio.as_deref()
    }
    fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }
    fn path(&self, slug: &str) -> String {
        format!("authors/{}", slug)
    }
    fn og_type(&self) -> &'static str {
        "profile"
    }
}

impl SeoSource for Category {
    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
    fn slug(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.as_str())
    }
    fn seo(&self) -> Option<&Seo> {
        self.seo.as_ref()
    }
    fn summary(&self) -> Option<&str> {
        self.description.as_deref()
    }
    fn path(&self, slug: &str) -> String {
        format!("categories/{}", slug)
    }
}

impl SeoSource for Legal {
    fn title(&self) -> &str {
        &self.title
    }
    fn slug(&self) -> Option<&str> {
        self.slug.as_ref().map(|s| s.as_str())
    }
    fn seo(&self) -> Option<&Seo> {
        self.seo.as_ref()
    }
    fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
    fn published(&self) -> Option<&str> {
        self.effective_date.as_deref()
    }
    fn modified(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }
    fn path(&self, slug: &str) -> String {
        format!("legal/{}", slug)
    }
}

/// Crop used for the Twitter image of a card type
pub fn twitter_image_size(card: &str) -> (u32, u32) {
    match card {
        "summary" => (600, 600),
        _ => (1200, 600),
    }
}

/// Site URL from settings, else the configured one
pub fn site_url<'a>(settings: Option<&'a SiteSettings>, ctx: &SeoContext<'a>) -> &'a str {
    settings.and_then(SiteSettings::url).unwrap_or(ctx.site_url)
}

/// Public URL of a document
pub fn document_url<D: SeoSource + ?Sized>(doc: &D, site: &str) -> String {
    match present(doc.slug()) {
        Some(slug) if slug == "/" => page_url(site, "/"),
        Some(slug) => page_url(site, &doc.path(slug)),
        None => site.to_string(),
    }
}

/// Metadata for a document's detail page
pub fn detail_metadata<D: SeoSource + ?Sized>(
    doc: &D,
    settings: Option<&SiteSettings>,
    ctx: &SeoContext<'_>,
) -> Metadata {
    let site = site_url(settings, ctx);
    let url = document_url(doc, site);
    let seo = doc.seo();
    let defaults = settings.and_then(|s| s.default_seo.as_ref());

    let title = present(seo.and_then(|s| s.title.as_deref()))
        .or_else(|| present(Some(doc.title())))
        .or_else(|| present(defaults.and_then(|s| s.title.as_deref())))
        .or_else(|| settings.and_then(SiteSettings::name))
        .unwrap_or(FALLBACK_SITE_TITLE)
        .to_string();

    let description = present(seo.and_then(|s| s.description.as_deref()))
        .or_else(|| present(doc.summary()))
        .or_else(|| present(defaults.and_then(|s| s.description.as_deref())))
        .or_else(|| settings.and_then(SiteSettings::description))
        .unwrap_or(FALLBACK_SITE_DESCRIPTION)
        .to_string();

    let image = seo
        .and_then(|s| s.image.as_ref())
        .or_else(|| doc.image())
        .or_else(|| defaults.and_then(|s| s.image.as_ref()));

    let og_settings = seo.and_then(|s| s.open_graph.as_ref());
    let og_type = present(og_settings.and_then(|o| o.og_type.as_deref()))
        .unwrap_or(doc.og_type());
    let site_name = present(og_settings.and_then(|o| o.site_name.as_deref()))
        .or_else(|| settings.and_then(SiteSettings::name))
        .map(str::to_string);

    let twitter_settings = seo
        .and_then(|s| s.twitter.as_ref())
        .or_else(|| defaults.and_then(|s| s.twitter.as_ref()));

    Metadata {
        base_url: site.to_string(),
        canonical: Some(
            present(seo.and_then(|s| s.canonical_url.as_deref()))
                .map(str::to_string)
                .unwrap_or_else(|| url.clone()),
        ),
        robots: Some(Robots {
            index: seo.and_then(|s| s.no_index) != Some(true),
            follow: seo.and_then(|s| s.no_follow) != Some(true),
        }),
        open_graph: Some(open_graph(
            og_type,
            present(og_settings.and_then(|o| o.locale.as_deref())),
            site_name,
            &title,
            Some(description.as_str()),
            &url,
            image,
            ctx,
        )),
        twitter: Some(twitter_card(
            twitter_settings,
            &title,
            Some(description.as_str()),
            image,
            ctx,
        )),
        title: Title::Plain(title),
        description: Some(description),
    }
}

/// Metadata for the site layout
pub fn layout_metadata(settings: Option<&SiteSettings>, ctx: &SeoContext<'_>) -> Metadata {
    let Some(settings) = settings else {
        return Metadata {
            base_url: ctx.site_url.to_string(),
            title: Title::Plain(FALLBACK_SITE_TITLE.to_string()),
            description: Some(FALLBACK_SITE_DESCRIPTION.to_string()),
            canonical: None,
            robots: None,
            open_graph: None,
            twitter: None,
        };
    };

    let site = site_url(Some(settings), ctx);
    let seo = settings.default_seo.as_ref();
    let site_name = settings.name().unwrap_or(FALLBACK_SITE_TITLE);

    let title = present(seo.and_then(|s| s.title.as_deref()))
        .unwrap_or(site_name)
        .to_string();
    let description = present(seo.and_then(|s| s.description.as_deref()))
        .or_else(|| settings.description())
        .map(str::to_string);
    let image = seo.and_then(|s| s.image.as_ref());
    let og_settings = seo.and_then(|s| s.open_graph.as_ref());

    Metadata {
        base_url: site.to_string(),
        canonical: Some(
            present(seo.and_then(|s| s.canonical_url.as_deref()))
                .unwrap_or(site)
                .to_string(),
        ),
        robots: Some(Robots {
            index: seo.and_then(|s| s.no_index) == Some(false),
            follow: seo.and_then(|s| s.no_follow) == Some(false),
        }),
        open_graph: Some(open_graph(
            present(og_settings.and_then(|o| o.og_type.as_deref())).unwrap_or(DEFAULT_OG_TYPE),
            present(og_settings.and_then(|o| o.locale.as_deref())),
            Some(
                present(og_settings.and_then(|o| o.site_name.as_deref()))
                    .unwrap_or(site_name)
                    .to_string(),
            ),
            &title,
            description.as_deref(),
            site,
            image,
            ctx,
        )),
        twitter: Some(twitter_card(
            seo.and_then(|s| s.twitter.as_ref()),
            &title,
            description.as_deref(),
            image,
            ctx,
        )),
        title: Title::Template {
            default: title.clone(),
            template: format!("%s | {}", site_name),
        },
        description,
    }
}

/// Metadata for a missing page
pub fn not_found_metadata(ctx: &SeoContext<'_>) -> Metadata {
    Metadata {
        base_url: ctx.site_url.to_string(),
        title: Title::Plain(NOT_FOUND_TITLE.to_string()),
        description: Some(NOT_FOUND_DESCRIPTION.to_string()),
        canonical: None,
        robots: None,
        open_graph: None,
        twitter: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn open_graph(
    og_type: &str,
    locale: Option<&str>,
    site_name: Option<String>,
    title: &str,
    description: Option<&str>,
    url: &str,
    image: Option<&Image>,
    ctx: &SeoContext<'_>,
) -> OpenGraph {
    let (width, height) = OG_IMAGE_SIZE;
    let images = image
        .and_then(|img| ctx.images.image(img).width(width).height(height).url())
        .map(|url| OgImage {
            url,
            width,
            height,
            alt: title.to_string(),
        })
        .into_iter()
        .collect();
    OpenGraph {
        og_type: og_type.to_string(),
        locale: locale.unwrap_or(DEFAULT_LOCALE).to_string(),
        site_name,
        title: title.to_string(),
        description: description.map(str::to_string),
        url: url.to_string(),
        images,
    }
}

fn twitter_card(
    settings: Option<&TwitterSettings>,
    title: &str,
    description: Option<&str>,
    image: Option<&Image>,
    ctx: &SeoContext<'_>,
) -> TwitterCard {
    let card = present(settings.and_then(|t| t.card.as_deref()))
        .unwrap_or(DEFAULT_TWITTER_CARD)
        .to_string();
    let (width, height) = twitter_image_size(&card);
    let images = image
        .and_then(|img| ctx.images.image(img).width(width).height(height).url())
        .into_iter()
        .collect();
    TwitterCard {
        site: present(settings.and_then(|t| t.site.as_deref())).map(str::to_string),
        creator: present(settings.and_then(|t| t.creator.as_deref())).map(str::to_string),
        card,
        title: title.to_string(),
        description: description.map(str::to_string),
        images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ImageAsset, OpenGraphSettings, Slug};

    fn images() -> ImageUrlBuilder {
        ImageUrlBuilder::new("proj", "production")
    }

    fn image(reference: &str) -> Image {
        Image {
            asset: Some(ImageAsset {
                id: Some(reference.to_string()),
                url: None,
            }),
            ..Default::default()
        }
    }

    fn settings() -> SiteSettings {
        SiteSettings {
            site_name: "Acme".to_string(),
            site_description: "We make things".to_string(),
            site_url: Some("https://acme.test".to_string()),
            ..Default::default()
        }
    }

    fn page(slug: &str) -> Page {
        Page {
            title: "About us".to_string(),
            slug: Some(Slug::new(slug)),
            excerpt: Some("Who we are".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_detail_fallback_chain() {
        let images = images();
        let ctx = SeoContext {
            site_url: "http://localhost:3000",
            images: &images,
        };
        let settings = settings();

        let meta = detail_metadata(&page("about"), Some(&settings), &ctx);
        assert_eq!(meta.title, Title::Plain("About us".to_string()));
        assert_eq!(meta.description.as_deref(), Some("Who we are"));
        assert_eq!(meta.canonical.as_deref(), Some("https://acme.test/about"));
        assert_eq!(meta.robots, Some(Robots { index: true, follow: true }));
        let og = meta.open_graph.unwrap();
        assert_eq!(og.og_type, "website");
        assert_eq!(og.locale, "en_US");
        assert_eq!(og.site_name.as_deref(), Some("Acme"));
        assert!(og.images.is_empty());
        assert_eq!(meta.twitter.unwrap().card, "summary_large_image");

        let mut bare = page("/");
        bare.excerpt = None;
        let meta = detail_metadata(&bare, Some(&settings), &ctx);
        assert_eq!(meta.description.as_deref(), Some("We make things"));
        assert_eq!(meta.canonical.as_deref(), Some("https://acme.test/"));

        let meta = detail_metadata(&bare, None, &ctx);
        assert_eq!(meta.description.as_deref(), Some(FALLBACK_SITE_DESCRIPTION));
        assert_eq!(meta.canonical.as_deref(), Some("http://localhost:3000/"));
    }

    #[test]
    fn test_seo_overrides_and_images() {
        let images = images();
        let ctx = SeoContext {
            site_url: "http://localhost:3000",
            images: &images,
        };
        let mut doc = page("about");
        doc.featured_image = Some(image("image-feat-2400x1260-jpg"));
        doc.seo = Some(Seo {
            title: Some("About Acme".to_string()),
            canonical_url: Some("https://canonical.test/about".to_string()),
            no_index: Some(true),
            open_graph: Some(OpenGraphSettings {
                og_type: Some("article".to_string()),
                locale: Some("de_DE".to_string()),
                site_name: None,
            }),
            twitter: Some(TwitterSettings {
                card: Some("summary".to_string()),
                site: Some("@acme".to_string()),
                creator: None,
            }),
            ..Default::default()
        });

        let meta = detail_metadata(&doc, None, &ctx);
        assert_eq!(meta.title.text(), "About Acme");
        assert_eq!(meta.canonical.as_deref(), Some("https://canonical.test/about"));
        assert_eq!(meta.robots, Some(Robots { index: false, follow: true }));

        let og = meta.open_graph.unwrap();
        assert_eq!(og.og_type, "article");
        assert_eq!(og.locale, "de_DE");
        assert_eq!(og.images[0].alt, "About Acme");
        assert!(og.images[0].url.ends_with("feat-2400x1260.jpg?w=1200&h=630"));

        let twitter = meta.twitter.unwrap();
        assert_eq!(twitter.site.as_deref(), Some("@acme"));
        assert!(twitter.images[0].ends_with("?w=600&h=600"));
    }

    #[test]
    fn test_twitter_crop_by_card() {
        assert_eq!(twitter_image_size("summary"), (600, 600));
        assert_eq!(twitter_image_size("summary_large_image"), (1200, 600));
        assert_eq!(twitter_image_size("player"), (1200, 600));
    }

    #[test]
    fn test_robots_asymmetry() {
        let images = images();
        let ctx = SeoContext {
            site_url: "http://localhost:3000",
            images: &images,
        };
        let mut settings = settings();

        // Unset flags: detail pages index, the layout does not
        let detail = detail_metadata(&page("about"), Some(&settings), &ctx);
        let layout = layout_metadata(Some(&settings), &ctx);
        assert_eq!(detail.robots, Some(Robots { index: true, follow: true }));
        assert_eq!(layout.robots, Some(Robots { index: false, follow: false }));

        settings.default_seo = Some(Seo {
            no_index: Some(false),
            no_follow: Some(false),
            ..Default::default()
        });
        let layout = layout_metadata(Some(&settings), &ctx);
        assert_eq!(layout.robots, Some(Robots { index: true, follow: true }));
    }

    #[test]
    fn test_layout_title_template() {
        let images = images();
        let ctx = SeoContext {
            site_url: "http://localhost:3000",
            images: &images,
        };
        let settings = settings();
        let layout = layout_metadata(Some(&settings), &ctx);
        assert_eq!(layout.title.text(), "Acme");
        assert_eq!(layout.canonical.as_deref(), Some("https://acme.test"));

        let page_meta = detail_metadata(&page("about"), Some(&settings), &ctx).within(&layout);
        assert_eq!(page_meta.title.text(), "About us | Acme");

        let fallback = layout_metadata(None, &ctx);
        assert_eq!(fallback.title.text(), FALLBACK_SITE_TITLE);
        assert!(fallback.robots.is_none());
        assert_eq!(not_found_metadata(&ctx).title.text(), NOT_FOUND_TITLE);
    }

    #[test]
    fn test_post_and_author_urls() {
        let images = images();
        let ctx = SeoContext {
            site_url: "https://acme.test",
            images: &images,
        };
        let post = Post {
            title: "Launch".to_string(),
            slug: Some(Slug::new("launch")),
            ..Default::default()
        };
        let meta = detail_metadata(&post, None, &ctx);
        assert_eq!(meta.canonical.as_deref(), Some("https://acme.test/blog/launch"));
        assert_eq!(meta.open_graph.unwrap().og_type, "article");

        let author = Author {
            name: "Ada".to_string(),
            slug: Some(Slug::new("ada")),
            bio: Some("Engineer".to_string()),
            ..Default::default()
        };
        let meta = detail_metadata(&author, None, &ctx);
        assert_eq!(meta.description.as_deref(), Some("Engineer"));
        assert_eq!(meta.canonical.as_deref(), Some("https://acme.test/authors/ada"));
    }
}
