//! Error types for arxiv-epub.
//!
//! Every variant is fatal for a conversion run. Degraded outcomes (an image
//! that fails to download, missing metadata) are logged and never surface here.

/// Error type for conversion operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or completed (network failure, timeout).
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// A URL could not be parsed.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The page had no element to convert.
    #[error("no content to convert")]
    NoContent,

    /// Writing the output file failed.
    #[error("failed to write EPUB: {0}")]
    Io(#[from] std::io::Error),

    /// The EPUB container could not be assembled.
    #[error("failed to build EPUB archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
