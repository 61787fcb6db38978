//! # arxiv-epub
//!
//! Converts arXiv HTML paper pages into single-chapter EPUB books.
//!
//! The page is fetched, stripped of page chrome, its MathML made valid for
//! EPUB readers, its images downloaded and embedded, and the result written
//! as an EPUB 3 container.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arxiv_epub::{convert_url, write_epub, Options};
//!
//! let options = Options::default();
//! let package = convert_url("https://arxiv.org/html/2401.00001", &options)?;
//! let path = arxiv_epub::epub::default_output_path(&package.title);
//! write_epub(&package, &path, &options)?;
//! # Ok::<(), arxiv_epub::Error>(())
//! ```
//!
//! ## Stages
//!
//! - **Fetch**: blocking HTTP GET with a browser user agent ([`fetch`])
//! - **Sanitize**: removes navigation, headers, footers and optionally the
//!   abstract and figures ([`sanitize`])
//! - **Metadata**: title and authors ([`metadata`])
//! - **MathML**: namespace and attribute whitelisting ([`mathml`])
//! - **Images**: download once per source, rewrite to local paths ([`images`])
//! - **Packaging**: OPF, navigation and container layout ([`epub`])

mod error;
mod options;
mod patterns;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// URL classification and resolution.
pub mod url_utils;

/// HTTP retrieval behind the `Fetch` trait.
pub mod fetch;

/// Boilerplate, abstract and figure removal.
pub mod sanitize;

/// Content region selection.
pub mod content;

/// MathML namespace and attribute normalization.
pub mod mathml;

/// Image download and rewriting.
pub mod images;

/// Title and author extraction.
pub mod metadata;

/// XHTML serialization.
pub mod xhtml;

/// EPUB container writer.
pub mod epub;

/// Stage orchestration.
pub mod pipeline;

use std::path::Path;

// Public API - re-exports
pub use epub::EpubWriter;
pub use error::{Error, Result};
pub use fetch::{Fetch, HttpFetcher, Response};
pub use images::ImageRecord;
pub use options::Options;
pub use pipeline::{convert, convert_html, Package};

/// Fetches and converts a paper page over HTTP.
///
/// # Example
///
/// ```rust,no_run
/// use arxiv_epub::{convert_url, Options};
///
/// let package = convert_url("https://arxiv.org/html/2401.00001", &Options::default())?;
/// println!("{} ({} images)", package.title, package.images.len());
/// # Ok::<(), arxiv_epub::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn convert_url(url: &str, options: &Options) -> Result<Package> {
    let fetcher = HttpFetcher::new()?;
    convert(url, options, &fetcher)
}

/// Writes a converted package as an EPUB file at `path`.
///
/// # Example
///
/// ```rust
/// use arxiv_epub::{convert_html, write_epub, HttpFetcher, Options};
///
/// let html = "<html><head><title>A Paper</title></head><body><p>Text</p></body></html>";
/// let options = Options::default();
/// let package = convert_html(html, "https://arxiv.org/html/1", &options, &HttpFetcher::new()?)?;
/// assert_eq!(package.title, "A Paper");
///
/// let path = std::env::temp_dir().join("arxiv_epub_doc.epub");
/// write_epub(&package, &path, &options)?;
/// # std::fs::remove_file(&path)?;
/// # Ok::<(), arxiv_epub::Error>(())
/// ```
#[allow(clippy::missing_errors_doc)]
pub fn write_epub(package: &Package, path: &Path, options: &Options) -> Result<()> {
    EpubWriter::new(options.max_authors).write_to_path(package, path)
}
