//! Conversion of one paper page into a [`Package`].
//!
//! Stages run in a fixed order over a single parsed document:
//! fetch, decode, parse, sanitize, metadata, content region, MathML, images,
//! XHTML. Only a failed page fetch or a page without content aborts the run.

use tracing::{debug, info};

use crate::content;
use crate::dom::{self, Selection};
use crate::encoding::transcode_to_utf8;
use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::images::{self, ImageRecord, ImageStore};
use crate::mathml;
use crate::metadata;
use crate::options::Options;
use crate::xhtml;

/// Book language.
pub const LANGUAGE: &str = "en";

/// Everything the packager needs for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Book title.
    pub title: String,

    /// Book language.
    pub language: String,

    /// All extracted author names. The packager decides how many to record.
    pub authors: Vec<String>,

    /// Chapter body as an XHTML fragment.
    pub content: String,

    /// Whether `content` embeds MathML.
    pub has_mathml: bool,

    /// Downloaded images in download order, paths relative to the chapter.
    pub images: Vec<ImageRecord>,
}

/// Fetch `url` and convert the page.
pub fn convert<F: Fetch>(url: &str, opts: &Options, fetcher: &F) -> Result<Package> {
    url::Url::parse(url).map_err(|source| Error::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    info!("Fetching HTML from {url}");
    let response = fetcher.get(url, opts.timeout)?;
    debug!(bytes = response.body.len(), content_type = ?response.content_type, "page fetched");

    let html = transcode_to_utf8(&response.body, response.content_type.as_deref());
    convert_html(&html, url, opts, fetcher)
}

/// Convert an already decoded page. `page_url` is used to resolve images.
pub fn convert_html<F: Fetch>(
    html: &str,
    page_url: &str,
    opts: &Options,
    fetcher: &F,
) -> Result<Package> {
    let doc = dom::parse(html);

    info!("Cleaning HTML");
    crate::sanitize::clean(&doc, opts);

    let metadata = metadata::extract(&doc);
    info!(title = %metadata.title, authors = metadata.authors.len(), "extracted metadata");

    let region = content::select_region(&doc).ok_or(Error::NoContent)?;

    let math_root = content::body(&doc).unwrap_or_else(|| region.clone());
    let math = mathml::normalize(&math_root);
    if math.has_mathml() {
        info!(islands = math.islands, "MathML detected");
    }

    info!("Processing images");
    let mut store = ImageStore::new();
    let stats = images::process(&region, page_url, opts, fetcher, &mut store);
    info!(
        downloaded = stats.downloaded,
        reused = stats.reused,
        dropped = stats.dropped,
        "images processed"
    );

    Ok(Package {
        title: metadata.title,
        language: LANGUAGE.to_string(),
        authors: metadata.authors,
        content: region_xhtml(&region),
        has_mathml: math.has_mathml(),
        images: store.into_records(),
    })
}

/// Serialize the region; a `<body>` region contributes only its children.
fn region_xhtml(region: &Selection) -> String {
    if dom::has_tag(region, &["body"]) {
        xhtml::inner_xhtml(region)
    } else {
        xhtml::outer_xhtml(region)
    }
}
