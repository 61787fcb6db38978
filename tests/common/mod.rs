//! Shared test fixtures: an in-memory `Fetch` serving canned responses.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use arxiv_epub::{Error, Fetch, Response, Result};

/// Page URL used by the fixtures.
pub const PAGE_URL: &str = "https://arxiv.org/html/2401.00001v1";

/// Minimal PNG signature, enough to stand in for image bytes.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Serves registered URLs; everything else answers 404.
#[derive(Default)]
pub struct MemoryFetcher {
    responses: HashMap<String, Response>,
    requests: RefCell<Vec<(String, Duration)>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a response body and content type for `url`.
    pub fn with(mut self, url: &str, body: &[u8], content_type: Option<&str>) -> Self {
        self.responses.insert(
            url.to_string(),
            Response {
                body: body.to_vec(),
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }

    /// Register an HTML page.
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.with(url, html.as_bytes(), Some("text/html; charset=utf-8"))
    }

    /// Number of requests made for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|(u, _)| u == url).count()
    }

    /// Timeout used for the first request to `url`.
    pub fn timeout_for(&self, url: &str) -> Option<Duration> {
        self.requests
            .borrow()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, t)| *t)
    }
}

impl Fetch for MemoryFetcher {
    fn get(&self, url: &str, timeout: Duration) -> Result<Response> {
        self.requests.borrow_mut().push((url.to_string(), timeout));
        self.responses.get(url).cloned().ok_or_else(|| Error::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
