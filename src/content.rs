//! Selection of the content region.
//!
//! Tries, in order: the first element whose id looks like a content
//! container, the first whose class does, `<article>`, `<main>`, `<body>`,
//! and finally the document root.

use crate::dom::{self, Document, Selection};
use crate::patterns::CONTENT_REGION;

/// Locate the subtree holding the paper content.
///
/// Returns `None` only for a document without any element.
#[must_use]
pub fn select_region(doc: &Document) -> Option<Selection<'_>> {
    let candidates = [
        first_by_attr(doc, "id"),
        first_by_attr(doc, "class"),
        first_of(doc, "article"),
        first_of(doc, "main"),
        first_of(doc, "body"),
        first_of(doc, "html"),
    ];

    candidates.into_iter().flatten().next()
}

/// The `<body>` element, if the document has one.
#[must_use]
pub fn body(doc: &Document) -> Option<Selection<'_>> {
    first_of(doc, "body")
}

fn first_by_attr<'a>(doc: &'a Document, attr: &str) -> Option<Selection<'a>> {
    dom::find_all_by_attr(doc, attr, &CONTENT_REGION).into_iter().next()
}

fn first_of<'a>(doc: &'a Document, tag: &str) -> Option<Selection<'a>> {
    let sel = doc.select(tag).first();
    sel.exists().then_some(sel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_id_over_class() {
        let doc = dom::parse(
            r#"<body><div class="ltx_page_main">A</div><div id="paper-content">B</div></body>"#,
        );
        let region = select_region(&doc);
        assert_eq!(region.and_then(|r| dom::get_attribute(&r, "id")), Some("paper-content".to_string()));
    }

    #[test]
    fn falls_back_to_class() {
        let doc = dom::parse(r#"<body><div class="ltx_page_main">A</div></body>"#);
        let region = select_region(&doc);
        assert_eq!(
            region.and_then(|r| dom::get_attribute(&r, "class")),
            Some("ltx_page_main".to_string())
        );
    }

    #[test]
    fn falls_back_to_article_then_main() {
        let doc = dom::parse(r#"<body><main><p>M</p></main><article><p>A</p></article></body>"#);
        let region = select_region(&doc);
        assert_eq!(region.and_then(|r| dom::tag_name(&r)), Some("article".to_string()));

        let doc = dom::parse(r#"<body><main><p>M</p></main></body>"#);
        let region = select_region(&doc);
        assert_eq!(region.and_then(|r| dom::tag_name(&r)), Some("main".to_string()));
    }

    #[test]
    fn falls_back_to_body() {
        let doc = dom::parse(r#"<html><body><p>text</p></body></html>"#);
        let region = select_region(&doc);
        assert_eq!(region.and_then(|r| dom::tag_name(&r)), Some("body".to_string()));
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let doc = dom::parse(
            r#"<body><div id="main-1"><div id="content-2">x</div></div></body>"#,
        );
        let region = select_region(&doc);
        assert_eq!(region.and_then(|r| dom::get_attribute(&r, "id")), Some("main-1".to_string()));
    }
}
