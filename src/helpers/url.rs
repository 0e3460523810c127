//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left readable in path segments
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Join a base URL and a path with exactly one slash between them
///
/// # Examples
/// ```ignore
/// join("https://example.com/", "/about") // -> "https://example.com/about"
/// ```
pub fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Public URL of a page
///
/// The home page is stored with slug `/` and maps to the site root.
///
/// # Examples
/// ```ignore
/// page_url("https://example.com", "/")     // -> "https://example.com/"
/// page_url("https://example.com", "about") // -> "https://example.com/about"
/// ```
pub fn page_url(site_url: &str, slug: &str) -> String {
    if slug == "/" {
        join(site_url, "")
    } else {
        join(site_url, slug)
    }
}

/// Percent-encode a single path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Whether `target` stays on this site
///
/// Used to refuse open redirects from query parameters.
pub fn is_local_path(target: &str) -> bool {
    let mut chars = target.chars();
    chars.next() == Some('/') && !matches!(chars.next(), Some('/' | '\\'))
}
