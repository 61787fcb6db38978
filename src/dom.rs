//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate: attribute access, tag/class/id
//! queries and subtree removal. Stages work on `Selection`s borrowed from a
//! single `Document` owned by the conversion run.

use regex::Regex;

use crate::patterns::WHITESPACE_NORMALIZE;

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

// === Attribute Operations ===

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

/// Set an attribute value
#[inline]
pub fn set_attribute(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}

/// Remove an attribute
#[inline]
pub fn remove_attribute(sel: &Selection, name: &str) {
    sel.remove_attr(name);
}

/// Local names of all attributes on the first node of the selection.
///
/// Returns an empty vector for an empty selection.
#[must_use]
pub fn attribute_names(sel: &Selection) -> Vec<String> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|attr| attr.name.local.to_string())
                .collect()
        })
        .unwrap_or_default()
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(dom_query::NodeRef::node_name)
        .map(|t| t.to_string())
}

/// Check whether the element's tag is one of `tags`.
#[must_use]
pub fn has_tag(sel: &Selection, tags: &[&str]) -> bool {
    tag_name(sel).is_some_and(|t| tags.iter().any(|tag| t.eq_ignore_ascii_case(tag)))
}

// === Text Content ===

/// Text of the node and its descendants with whitespace runs collapsed
/// and the ends trimmed.
#[must_use]
pub fn collapsed_text(sel: &Selection) -> String {
    WHITESPACE_NORMALIZE
        .replace_all(&sel.text(), " ")
        .trim()
        .to_string()
}

// === Querying ===

/// Split a selection into one `Selection` per node, in document order.
#[must_use]
pub fn each<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    sel.nodes().iter().map(|node| Selection::from(*node)).collect()
}

/// Elements whose `attr` value matches `pattern` (regex search).
#[must_use]
pub fn find_all_by_attr<'a>(doc: &'a Document, attr: &str, pattern: &Regex) -> Vec<Selection<'a>> {
    each(&doc.select(&format!("[{attr}]")))
        .into_iter()
        .filter(|el| get_attribute(el, attr).is_some_and(|v| pattern.is_match(&v)))
        .collect()
}

/// Nearest ancestor whose tag is one of `tags`.
#[must_use]
pub fn closest_ancestor<'a>(sel: &Selection<'a>, tags: &[&str]) -> Option<Selection<'a>> {
    let mut current = sel.parent();

    while current.exists() {
        if has_tag(&current, tags) {
            return Some(current);
        }
        current = current.parent();
    }

    None
}

// === Tree Manipulation ===

/// Detach elements (and their subtrees) from the tree
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Detach every element in `elements`.
///
/// Nested matches are fine: removing an already detached subtree is a no-op
/// as far as the document is concerned.
pub fn remove_all(elements: &[Selection]) {
    for el in elements {
        remove(el);
    }
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}
