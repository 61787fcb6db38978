//! HTTP retrieval of the paper page and its images.
//!
//! The `Fetch` trait is the seam between the pipeline and the network, so the
//! pipeline can run against canned responses in tests.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{Error, Result};

/// Browser user agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Timeout for each image download.
pub const IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A successful response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Raw body bytes.
    pub body: Vec<u8>,

    /// `Content-Type` header value, if sent.
    pub content_type: Option<String>,
}

/// Blocking GET of a URL.
///
/// Implementations must map network failures, timeouts and non-success
/// statuses to `Err`. No retries.
pub trait Fetch {
    fn get(&self, url: &str, timeout: Duration) -> Result<Response>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn get(&self, url: &str, timeout: Duration) -> Result<Response> {
        (**self).get(url, timeout)
    }
}

/// `Fetch` over a blocking reqwest client.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher that identifies as a desktop browser.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| Error::Request {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str, timeout: Duration) -> Result<Response> {
        debug!(%url, ?timeout, "GET");
        let request_error = |source| Error::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().map_err(request_error)?.to_vec();

        Ok(Response { body, content_type })
    }
}
