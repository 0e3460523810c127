//! HTTP server
//!
//! Every request runs the same pipeline: the redirect check, then content
//! fetches through the content client, then SEO resolution, then rendering.
//! Draft mode is a per-request flag carried in a cookie.

use anyhow::Result;
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::artifacts::{self, images, ImageKind};
use crate::client::{ContentClient, FetchMode};
use crate::helpers::{blocks_to_html, image_tag, is_local_path, short_date};
use crate::query::{catalog, Query as ContentQuery};
use crate::redirect::{RedirectMatch, RedirectResolver};
use crate::schema::{Navigation, Page, Post, RedirectStatus, SiteSettings};
use crate::seo::{
    detail_metadata, layout_metadata, not_found_metadata, organization, render_head, script_tag,
    web_page, SeoSource,
};
use crate::sitemap;
use crate::templates::{render_page, PageView};
use crate::Site;

/// Server state
struct ServerState {
    site: Site,
    redirects: RedirectResolver,
}

type SharedState = Arc<ServerState>;

/// Build the application router
pub fn router(site: Site) -> Router {
    let state = Arc::new(ServerState {
        redirects: site.redirects(),
        site,
    });

    let mut app = Router::new()
        .route("/", get(home_handler))
        .route("/:slug", get(page_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .route("/manifest.webmanifest", get(manifest_handler))
        .route("/api/draft-mode/enable", get(enable_draft_handler))
        .route("/api/draft-mode/disable", get(disable_draft_handler));
    for kind in ImageKind::ALL {
        app = app.route(
            kind.route(),
            get(move |State(state): State<SharedState>| image_handler(state, kind)),
        );
    }

    app.fallback(fallback_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            redirect_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: Site, ip: &str, port: u16) -> Result<()> {
    let app = router(site);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn status_code(status: RedirectStatus) -> StatusCode {
    match status {
        RedirectStatus::MovedPermanently => StatusCode::MOVED_PERMANENTLY,
        RedirectStatus::Found => StatusCode::FOUND,
        RedirectStatus::TemporaryRedirect => StatusCode::TEMPORARY_REDIRECT,
        RedirectStatus::PermanentRedirect => StatusCode::PERMANENT_REDIRECT,
    }
}

fn redirect_to(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::warn!("Invalid redirect location: {:?}", location);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Short-circuit requests that match a redirect
async fn redirect_middleware(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if !path.starts_with("/api/") {
        if let Some(RedirectMatch {
            destination,
            status,
        }) = state.redirects.resolve(&path).await
        {
            return redirect_to(status_code(status), &destination);
        }
    }
    next.run(request).await
}

/// Whether the request carries a non-empty cookie called `name`
fn has_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(key, value)| key == name && !value.is_empty())
}

fn fetch_mode(state: &ServerState, headers: &HeaderMap) -> FetchMode {
    if has_cookie(headers, &state.site.config.preview.cookie) && state.site.client.has_token() {
        FetchMode::Draft
    } else {
        FetchMode::Published
    }
}

/// Navigation menus, best effort
async fn navigation(client: &ContentClient, mode: FetchMode) -> Option<Navigation> {
    match client.fetch_one(&catalog::navigation(), mode).await {
        Ok(nav) => nav,
        Err(e) => {
            tracing::warn!("Failed to fetch navigation: {}", e);
            None
        }
    }
}

/// A document plus its studio link when read in draft mode
struct Fetched<T> {
    doc: T,
    edit_url: Option<String>,
}

async fn fetch_document<T: DeserializeOwned>(
    client: &ContentClient,
    query: &ContentQuery,
    mode: FetchMode,
) -> crate::Result<Option<Fetched<T>>> {
    let value = client.fetch_value(query, mode).await?;
    if value.is_null() {
        return Ok(None);
    }
    let edit_url = value
        .get("_editUrl")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(Some(Fetched {
        doc: serde_json::from_value(value)?,
        edit_url,
    }))
}

/// Per-request content shared by every HTML page
struct Chrome {
    settings: Option<SiteSettings>,
    navigation: Option<Navigation>,
    mode: FetchMode,
}

impl Chrome {
    async fn load(state: &ServerState, mode: FetchMode) -> Self {
        let client = &state.site.client;
        let (settings, navigation) =
            tokio::join!(client.site_settings(mode), navigation(client, mode));
        Self {
            settings,
            navigation,
            mode,
        }
    }

    fn site_name(&self) -> &str {
        self.settings
            .as_ref()
            .and_then(SiteSettings::name)
            .unwrap_or(crate::seo::metadata::FALLBACK_SITE_TITLE)
    }
}

fn render_document<D: SeoSource>(
    state: &ServerState,
    chrome: &Chrome,
    doc: &D,
    body_html: String,
    byline: Option<String>,
    edit_url: Option<&str>,
) -> Response {
    let ctx = state.site.seo_context();
    let settings = chrome.settings.as_ref();
    let layout = layout_metadata(settings, &ctx);
    let meta = detail_metadata(doc, settings, &ctx).within(&layout);
    let head = [
        render_head(&meta),
        script_tag(&organization(settings, &ctx)),
        script_tag(&web_page(doc, settings, &ctx)),
    ]
    .join("\n");

    let view = PageView {
        head,
        site_name: chrome.site_name(),
        navigation: chrome.navigation.as_ref(),
        title: doc.title(),
        byline,
        body_html,
        draft: chrome.mode.is_draft(),
        edit_url,
    };
    Html(render_page(&view)).into_response()
}

fn not_found(state: &ServerState, chrome: &Chrome) -> Response {
    let ctx = state.site.seo_context();
    let settings = chrome.settings.as_ref();
    let meta = not_found_metadata(&ctx).within(&layout_metadata(settings, &ctx));
    let view = PageView {
        head: render_head(&meta),
        site_name: chrome.site_name(),
        navigation: chrome.navigation.as_ref(),
        title: crate::seo::metadata::NOT_FOUND_TITLE,
        body_html: format!(
            "<p>{}</p>",
            crate::seo::metadata::NOT_FOUND_DESCRIPTION
        ),
        draft: chrome.mode.is_draft(),
        ..Default::default()
    };
    (StatusCode::NOT_FOUND, Html(render_page(&view))).into_response()
}

fn server_error(e: &crate::Error) -> Response {
    tracing::error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Featured image above the body, if any
fn hero(state: &ServerState, image: Option<&crate::schema::Image>) -> String {
    image
        .and_then(|img| {
            let url = state
                .site
                .client
                .images()
                .image(img)
                .width(1200)
                .auto_format()
                .url()?;
            Some(image_tag(&url, img.alt.as_deref(), None, None))
        })
        .map(|tag| format!("{}\n", tag))
        .unwrap_or_default()
}

async fn serve_page(state: &ServerState, headers: &HeaderMap, slug: &str) -> Response {
    let mode = fetch_mode(state, headers);
    let chrome = Chrome::load(state, mode).await;
    let fetched: Option<Fetched<Page>> =
        match fetch_document(&state.site.client, &catalog::page_by_slug(slug), mode).await {
            Ok(found) => found,
            Err(e) => return server_error(&e),
        };
    let Some(Fetched { doc: page, edit_url }) = fetched else {
        return not_found(state, &chrome);
    };
    if !page.is_published() && !mode.is_draft() {
        return not_found(state, &chrome);
    }

    let body = format!(
        "{}{}",
        hero(state, page.featured_image.as_ref()),
        blocks_to_html(&page.body)
    );
    render_document(state, &chrome, &page, body, None, edit_url.as_deref())
}

async fn home_handler(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    serve_page(&state, &headers, "/").await
}

async fn page_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    serve_page(&state, &headers, &slug).await
}

async fn post_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Response {
    let mode = fetch_mode(&state, &headers);
    let chrome = Chrome::load(&state, mode).await;
    let fetched: Option<Fetched<Post>> =
        match fetch_document(&state.site.client, &catalog::post_by_slug(&slug), mode).await {
            Ok(found) => found,
            Err(e) => return server_error(&e),
        };
    let Some(Fetched { doc: post, edit_url }) = fetched else {
        return not_found(&state, &chrome);
    };
    if !post.is_published() && !mode.is_draft() {
        return not_found(&state, &chrome);
    }

    let mut byline = post
        .published_at
        .as_deref()
        .and_then(short_date)
        .unwrap_or_default();
    if post.reading_time.is_some() {
        if !byline.is_empty() {
            byline.push_str(", ");
        }
        byline.push_str(&format!("{} min read", post.reading_time()));
    }
    let body = format!(
        "{}{}",
        hero(&state, post.featured_image.as_ref()),
        blocks_to_html(&post.body)
    );
    let byline = Some(byline).filter(|b| !b.is_empty());
    render_document(&state, &chrome, &post, body, byline, edit_url.as_deref())
}

async fn fallback_handler(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let chrome = Chrome::load(&state, fetch_mode(&state, &headers)).await;
    not_found(&state, &chrome)
}

async fn sitemap_handler(State(state): State<SharedState>) -> Response {
    match sitemap::generate(&state.site.client, Utc::now()).await {
        Ok(entries) => (
            [(header::CONTENT_TYPE, "application/xml")],
            sitemap::render_xml(&entries),
        )
            .into_response(),
        Err(e) => server_error(&e),
    }
}

async fn robots_handler(State(state): State<SharedState>) -> Response {
    let settings = state.site.client.site_settings(FetchMode::Published).await;
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        artifacts::robots_policy(settings.as_ref()).to_txt(),
    )
        .into_response()
}

async fn manifest_handler(State(state): State<SharedState>) -> Response {
    let settings = state.site.client.site_settings(FetchMode::Published).await;
    let manifest = artifacts::manifest(settings.as_ref(), state.site.client.images());
    (
        [(header::CONTENT_TYPE, "application/manifest+json")],
        Json(manifest),
    )
        .into_response()
}

async fn image_handler(state: SharedState, kind: ImageKind) -> Response {
    let settings = state.site.client.site_settings(FetchMode::Published).await;
    (
        [(header::CONTENT_TYPE, images::CONTENT_TYPE)],
        artifacts::render_image(kind, settings.as_ref(), state.site.client.images()),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
struct DraftParams {
    secret: Option<String>,
    redirect: Option<String>,
}

impl DraftParams {
    /// Where to go afterwards; only local paths are honoured
    fn target(&self) -> &str {
        self.redirect
            .as_deref()
            .filter(|r| is_local_path(r))
            .unwrap_or("/")
    }
}

fn with_cookie(mut response: Response, cookie: String) -> Response {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
            response
        }
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn enable_draft_handler(
    State(state): State<SharedState>,
    Query(params): Query<DraftParams>,
) -> Response {
    let preview = &state.site.config.preview;
    let authorized = match (&preview.secret, &params.secret) {
        (Some(expected), Some(given)) => expected == given,
        _ => false,
    };
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Invalid secret").into_response();
    }
    if !state.site.client.has_token() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Draft mode requires a viewer token",
        )
            .into_response();
    }

    tracing::info!("Draft mode enabled");
    with_cookie(
        redirect_to(StatusCode::TEMPORARY_REDIRECT, params.target()),
        format!("{}=1; Path=/; HttpOnly; SameSite=Lax", preview.cookie),
    )
}

async fn disable_draft_handler(
    State(state): State<SharedState>,
    Query(params): Query<DraftParams>,
) -> Response {
    with_cookie(
        redirect_to(StatusCode::TEMPORARY_REDIRECT, params.target()),
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            state.site.config.preview.cookie
        ),
    )
}
