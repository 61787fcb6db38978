//! Title and author extraction.
//!
//! Reads the sanitized document without modifying it.

use std::collections::HashSet;

use crate::dom::{self, Document, Selection};
use crate::patterns::{AUTHOR_CLASS, AUTHOR_DISALLOWED, WHITESPACE_NORMALIZE};

/// Title used when the page has neither a heading nor a `<title>`.
pub const FALLBACK_TITLE: &str = "arXiv Paper";

/// Author names must be shorter than this many characters.
const MAX_AUTHOR_CHARS: usize = 100;

/// Meta tag names consulted for authors, in priority order.
const AUTHOR_META_SELECTORS: &[&str] = &["meta[name='citation_author']", "meta[name='author']"];

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Book title.
    pub title: String,

    /// Cleaned author names in discovery order. Never truncated here.
    pub authors: Vec<String>,
}

/// Extract title and authors.
#[must_use]
pub fn extract(doc: &Document) -> Metadata {
    Metadata {
        title: extract_title(doc),
        authors: extract_authors(doc),
    }
}

/// First `<h1>` text, else `<title>` text, else [`FALLBACK_TITLE`].
#[must_use]
pub fn extract_title(doc: &Document) -> String {
    ["h1", "title"]
        .iter()
        .map(|tag| doc.select(tag).first())
        .filter(Selection::exists)
        .map(|el| dom::collapsed_text(&el))
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

/// Authors from citation/author meta tags, falling back to elements whose
/// class mentions "author" only when the meta tags yield nobody.
#[must_use]
pub fn extract_authors(doc: &Document) -> Vec<String> {
    let mut authors = AuthorList::default();

    for selector in AUTHOR_META_SELECTORS {
        for meta in dom::each(&doc.select(selector)) {
            authors.push(&dom::get_attribute(&meta, "content").unwrap_or_default());
        }
    }

    if authors.is_empty() {
        for el in dom::find_all_by_attr(doc, "class", &AUTHOR_CLASS) {
            authors.push(&dom::collapsed_text(&el));
        }
    }

    authors.names
}

/// Strip an author name down to word characters, whitespace, `-`, `.`
/// and `,`, collapsing whitespace.
#[must_use]
pub fn clean_author_name(name: &str) -> String {
    let stripped = AUTHOR_DISALLOWED.replace_all(name, "");
    WHITESPACE_NORMALIZE
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// Ordered author list rejecting duplicates by raw or cleaned text.
#[derive(Default)]
struct AuthorList {
    names: Vec<String>,
    seen_raw: HashSet<String>,
}

impl AuthorList {
    fn push(&mut self, raw: &str) {
        let raw = raw.trim();
        if raw.is_empty() || !self.seen_raw.insert(raw.to_string()) {
            return;
        }

        let cleaned = clean_author_name(raw);
        if cleaned.is_empty()
            || cleaned.chars().count() >= MAX_AUTHOR_CHARS
            || self.names.contains(&cleaned)
        {
            return;
        }
        self.names.push(cleaned);
    }

    fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
