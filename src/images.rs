//! Image discovery, download and rewriting.
//!
//! Each `<img>` in the content region is resolved against the page URL,
//! downloaded once per unique source, and pointed at a local file under
//! `images/`. Images that cannot be fetched are removed from the tree.

use std::collections::HashMap;

use md5::{Digest, Md5};
use tracing::{debug, warn};

use crate::dom::{self, Selection};
use crate::fetch::{Fetch, IMAGE_TIMEOUT};
use crate::options::Options;
use crate::patterns::{IMAGE_CONTENT_TYPES, IMAGE_EXTENSIONS};
use crate::url_utils;

/// Directory inside the book holding downloaded images.
pub const IMAGE_DIR: &str = "images";

/// One downloaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Path inside the book, e.g. `images/img_1_1a2b3c4d.png`.
    pub local_path: String,

    /// Downloaded bytes.
    pub data: Vec<u8>,

    /// Resolved source URL.
    pub original_url: String,
}

/// Downloaded images keyed by resolved source URL, in download order.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    records: Vec<ImageRecord>,
    by_url: HashMap<String, usize>,
}

impl ImageStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record for a resolved source URL.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<&ImageRecord> {
        self.by_url.get(url).map(|&i| &self.records[i])
    }

    /// Number of downloaded images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was downloaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the store, returning records in download order.
    #[must_use]
    pub fn into_records(self) -> Vec<ImageRecord> {
        self.records
    }

    fn insert(&mut self, record: ImageRecord) -> &ImageRecord {
        let index = self.records.len();
        self.by_url.insert(record.original_url.clone(), index);
        self.records.push(record);
        &self.records[index]
    }
}

/// Counters for one processing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageStats {
    /// Images downloaded in this pass.
    pub downloaded: usize,

    /// References rewritten to an image downloaded earlier.
    pub reused: usize,

    /// Inline `data:` images left untouched.
    pub inline: usize,

    /// Images removed because they could not be fetched or came back empty.
    pub dropped: usize,
}

/// Download and rewrite every image under `region`.
///
/// References are visited in document order. The store is consulted before
/// each download, so an image referenced several times is fetched once and
/// every reference points at the same local path.
pub fn process<F: Fetch>(
    region: &Selection,
    page_url: &str,
    opts: &Options,
    fetcher: &F,
    store: &mut ImageStore,
) -> ImageStats {
    let mut stats = ImageStats::default();

    for img in dom::each(&region.select("img")) {
        let src = dom::get_attribute(&img, "src").unwrap_or_default();

        if url_utils::is_data_uri(&src) {
            stats.inline += 1;
            continue;
        }

        let Some(resolved) = url_utils::resolve_against_page(&src, page_url) else {
            warn!(%src, "cannot resolve image source; dropping image");
            dom::remove(&img);
            stats.dropped += 1;
            continue;
        };

        if let Some(record) = store.get(&resolved) {
            debug!(url = %resolved, path = %record.local_path, "image already downloaded");
            dom::set_attribute(&img, "src", &record.local_path);
            stats.reused += 1;
            continue;
        }

        match fetcher.get(&resolved, IMAGE_TIMEOUT) {
            Ok(response) if response.body.is_empty() => {
                warn!("image {resolved} has an empty body; dropping image");
                dom::remove(&img);
                stats.dropped += 1;
            }
            Ok(response) => {
                let ext = image_extension(&resolved, response.content_type.as_deref());
                let local_path = local_image_path(store.len() + 1, &resolved, &ext);
                debug!(url = %resolved, path = %local_path, bytes = response.body.len(), "downloaded image");

                let record = store.insert(ImageRecord {
                    local_path,
                    data: response.body,
                    original_url: resolved,
                });
                dom::set_attribute(&img, "src", &record.local_path);
                if let Some(width) = opts.max_image_width {
                    dom::set_attribute(&img, "style", &width_style(width));
                }
                stats.downloaded += 1;
            }
            Err(err) => {
                warn!("could not download image {resolved}: {err}");
                dom::remove(&img);
                stats.dropped += 1;
            }
        }
    }

    stats
}

/// First eight hex characters of the MD5 digest of a source URL.
#[must_use]
pub fn fingerprint(url: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(url.as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    hash[..8].to_string()
}

/// File extension (with dot) for a downloaded image.
///
/// An image `Content-Type` wins, then a known image suffix on the URL path,
/// then `.png`.
#[must_use]
pub fn image_extension(url: &str, content_type: Option<&str>) -> String {
    let from_header = content_type.and_then(|ct| {
        let mime = ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        IMAGE_CONTENT_TYPES
            .iter()
            .find(|(known, _)| *known == mime)
            .map(|(_, ext)| (*ext).to_string())
    });

    from_header
        .or_else(|| {
            url_utils::path_extension(url)
                .map(|ext| ext.to_ascii_lowercase())
                .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        })
        .unwrap_or_else(|| ".png".to_string())
}

/// Local path for the `sequence`-th downloaded image.
#[must_use]
pub fn local_image_path(sequence: usize, url: &str, ext: &str) -> String {
    format!("{IMAGE_DIR}/img_{sequence}_{}{ext}", fingerprint(url))
}

fn width_style(width: u32) -> String {
    format!("max-width: {width}px; height: auto;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_short_and_stable() {
        let a = fingerprint("https://example.org/fig.png");
        assert_eq!(a.len(), 8);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, fingerprint("https://example.org/fig.png"));
        assert_ne!(a, fingerprint("https://example.org/fig2.png"));
    }

    #[test]
    fn fingerprint_is_md5_prefix() {
        assert_eq!(fingerprint("https://example.org/fig.png"), "214d8f86");
        assert_eq!(
            local_image_path(1, "https://example.org/fig.png", ".png"),
            "images/img_1_214d8f86.png"
        );
    }

    #[test]
    fn extension_prefers_content_type() {
        assert_eq!(image_extension("https://e.org/x.png", Some("image/jpeg")), ".jpg");
        assert_eq!(
            image_extension("https://e.org/x", Some("image/svg+xml; charset=utf-8")),
            ".svg"
        );
    }

    #[test]
    fn extension_ignores_non_image_content_type() {
        assert_eq!(image_extension("https://e.org/x.gif", Some("text/html")), ".gif");
        assert_eq!(image_extension("https://e.org/x.GIF", None), ".gif");
    }

    #[test]
    fn extension_defaults_to_png() {
        assert_eq!(image_extension("https://e.org/x.bmp", None), ".png");
        assert_eq!(image_extension("https://e.org/x", None), ".png");
    }

    #[test]
    fn local_path_layout() {
        let url = "https://example.org/fig.png";
        let path = local_image_path(3, url, ".png");
        assert_eq!(path, format!("images/img_3_{}.png", fingerprint(url)));
    }

    #[test]
    fn store_lookup_by_url() {
        let mut store = ImageStore::new();
        assert!(store.is_empty());

        store.insert(ImageRecord {
            local_path: "images/img_1_abcd1234.png".to_string(),
            data: vec![1, 2, 3],
            original_url: "https://e.org/a.png".to_string(),
        });

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("https://e.org/a.png").map(|r| r.local_path.as_str()),
            Some("images/img_1_abcd1234.png")
        );
        assert!(store.get("https://e.org/b.png").is_none());
    }
}
