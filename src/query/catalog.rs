//! Named queries used by the site

use super::{Direction, Filter, Operand, Projection, Query, Slice};

fn image() -> Projection {
    Projection::new().fields(&["_type", "asset", "hotspot", "crop", "alt", "caption"])
}

fn seo() -> Projection {
    Projection::new()
        .fields(&[
            "title",
            "description",
            "keywords",
            "noIndex",
            "noFollow",
            "canonicalUrl",
            "structuredData",
        ])
        .object("image", image())
        .object("openGraph", Projection::new().fields(&["type", "locale", "siteName"]))
        .object("twitter", Projection::new().fields(&["card", "site", "creator"]))
}

/// Active and not yet expired
fn live_redirect() -> Filter {
    Filter::and(vec![
        Filter::eq("isActive", Operand::literal(true)),
        Filter::or(vec![
            Filter::not(Filter::defined("expiryDate")),
            Filter::gt("expiryDate", Operand::Now),
        ]),
    ])
}

/// Link targets resolved to just enough to build an `href`
fn menu_item() -> Projection {
    Projection::all().deref(
        "internalLink",
        Projection::new().fields(&["_id", "_type", "slug"]),
    )
}

/// The page published at `slug` (`/` for the home page)
pub fn page_by_slug(slug: &str) -> Query {
    Query::star()
        .filter_by_type("page")
        .filter(Filter::eq("slug.current", Operand::param("slug")))
        .order("publishDate", Direction::Asc)
        .order("_updatedAt", Direction::Desc)
        .slice(Slice::Index(0))
        .project(
            Projection::new()
                .fields(&[
                    "_id",
                    "_type",
                    "title",
                    "slug",
                    "pageType",
                    "excerpt",
                    "template",
                    "isPublished",
                    "publishDate",
                    "lastModified",
                    "showInNavigation",
                    "navigationTitle",
                    "body",
                ])
                .object("featuredImage", image())
                .object("seo", seo()),
        )
        .param("slug", slug)
}

pub fn post_by_slug(slug: &str) -> Query {
    Query::star()
        .filter_by_type("post")
        .filter(Filter::eq("slug.current", Operand::param("slug")))
        .order("publishedAt", Direction::Desc)
        .slice(Slice::Index(0))
        .project(
            Projection::all()
                .object("featuredImage", image())
                .object("seo", seo()),
        )
        .param("slug", slug)
}

/// Settings singleton; callers take the first element
pub fn site_settings() -> Query {
    Query::star()
        .filter_by_type("siteSettings")
        .slice(Slice::Range(0, 1))
        .project(
            Projection::new()
                .fields(&[
                    "_id",
                    "_type",
                    "siteName",
                    "siteDescription",
                    "siteUrl",
                    "socialLinks",
                ])
                .object("logo", image())
                .object("favicon", image())
                .object("contactInfo", Projection::new().fields(&["email", "phone", "address"]))
                .object("defaultSEO", seo()),
        )
}

pub fn navigation() -> Query {
    Query::star()
        .filter_by_type("navigation")
        .slice(Slice::Index(0))
        .project(
            Projection::new()
                .field("_id")
                .array(
                    "mainMenu",
                    menu_item().array("subItems", menu_item()),
                )
                .array("footerMenu", menu_item()),
        )
}

/// Every live redirect, best match first
pub fn active_redirects() -> Query {
    Query::star()
        .filter_by_type("redirect")
        .filter(live_redirect())
        .order("priority", Direction::Desc)
        .order("source", Direction::Asc)
        .project(Projection::new().fields(&[
            "_id",
            "source",
            "destination",
            "type",
            "priority",
            "isActive",
            "expiryDate",
        ]))
}

/// The live redirect for exactly `path`, if any
pub fn redirect_by_path(path: &str) -> Query {
    Query::star()
        .filter_by_type("redirect")
        .filter(Filter::eq("source", Operand::param("source")))
        .filter(live_redirect())
        .order("priority", Direction::Desc)
        .slice(Slice::Index(0))
        .project(Projection::new().fields(&[
            "_id",
            "source",
            "destination",
            "type",
            "priority",
            "isActive",
            "expiryDate",
        ]))
        .param("source", path)
}

/// Published pages that have a slug, trimmed to what the sitemap needs
pub fn sitemap_pages() -> Query {
    Query::star()
        .filter_by_type("page")
        .filter(Filter::eq("isPublished", Operand::literal(true)))
        .filter(Filter::defined("slug.current"))
        .project(
            Projection::new()
                .field("_id")
                .alias("slug", "slug.current")
                .fields(&["pageType", "lastModified", "publishDate"])
                .object("seo", Projection::new().field("noIndex")),
        )
}

/// All documents of one type, newest first
pub fn documents_of_type(doc_type: &str) -> Query {
    Query::star()
        .filter_by_type(doc_type)
        .order("_updatedAt", Direction::Desc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_active_redirects_groq() {
        assert_eq!(
            active_redirects().to_groq(),
            "*[_type == \"redirect\" && isActive == true && (!defined(expiryDate) || expiryDate > now())] \
             | order(priority desc, source asc) \
             {_id, source, destination, type, priority, isActive, expiryDate}"
        );
    }

    #[test]
    fn test_redirect_queries_skip_expired() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let docs = vec![
            json!({"_id": "old", "_type": "redirect", "source": "/a", "destination": "/x",
                   "isActive": true, "priority": 90, "expiryDate": "2025-02-01"}),
            json!({"_id": "live", "_type": "redirect", "source": "/a", "destination": "/y",
                   "isActive": true, "priority": 10}),
            json!({"_id": "off", "_type": "redirect", "source": "/a", "destination": "/z",
                   "isActive": false, "priority": 99}),
        ];
        let found = redirect_by_path("/a").evaluate(&docs, now).unwrap();
        assert_eq!(found["destination"], "/y");

        let all = active_redirects().evaluate(&docs, now).unwrap();
        assert_eq!(all.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_sitemap_pages_shape() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let docs = vec![
            json!({"_id": "p1", "_type": "page", "isPublished": true,
                   "slug": {"current": "about"}, "pageType": "about",
                   "seo": {"noIndex": false, "title": "ignored"}}),
            json!({"_id": "p2", "_type": "page", "isPublished": false,
                   "slug": {"current": "draft"}}),
            json!({"_id": "p3", "_type": "page", "isPublished": true}),
        ];
        let pages = sitemap_pages().evaluate(&docs, now).unwrap();
        assert_eq!(
            pages,
            json!([{"_id": "p1", "slug": "about", "pageType": "about",
                    "lastModified": null, "publishDate": null, "seo": {"noIndex": false}}])
        );
    }
}
