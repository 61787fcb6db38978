//! URL Utility Functions
//!
//! Resolution of image sources against the page URL and path inspection
//! used when naming downloaded files.

use std::path::Path;

use url::Url;

/// Check whether a source is already an absolute http(s) URL.
#[must_use]
pub fn is_absolute_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Check whether a source is an inline `data:` URI.
#[must_use]
pub fn is_data_uri(s: &str) -> bool {
    s.starts_with("data:")
}

/// Resolve an image source found on `page_url`.
///
/// Absolute sources are returned unchanged. Anything else is joined against
/// the page URL with a `/` appended, so the page itself acts as a directory:
/// `img/x.png` on `https://host/html/2401.1` becomes
/// `https://host/html/2401.1/img/x.png`.
///
/// # Returns
/// * `None` if the page URL cannot serve as a base
#[must_use]
pub fn resolve_against_page(src: &str, page_url: &str) -> Option<String> {
    if is_absolute_url(src) {
        return Some(src.to_string());
    }

    let base = Url::parse(&format!("{page_url}/")).ok()?;
    base.join(src).ok().map(String::from)
}

/// Extension (with leading dot) of the URL's path, if any.
///
/// Query strings and fragments are ignored.
#[must_use]
pub fn path_extension(url_str: &str) -> Option<String> {
    let url = Url::parse(url_str).ok()?;
    Path::new(url.path())
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
}
