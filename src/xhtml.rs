//! XHTML serialization of a processed subtree.
//!
//! EPUB content documents are XML, so the HTML serializer's output (bare
//! `<img>`, `<br>`, unescaped `&` in attributes) is not usable as-is.
//! Elements are written with escaped text and attribute values, void
//! elements self-close, and comments are dropped.
//!
//! The HTML parser accepts names and characters XML does not. Characters
//! outside the XML 1.0 `Char` production are dropped. Attributes whose name
//! is not a valid XML name, or whose prefix is not bound, are skipped. An
//! element with such a name is replaced by its children.

use std::fmt::Write;

use crate::dom::{NodeRef, Selection};

/// HTML elements that never have content.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Prefixes bound in every XML document.
const PREDECLARED_PREFIXES: &[&str] = &["xml", "xmlns"];

/// Serialize the first node of `sel`, including the node itself.
#[must_use]
pub fn outer_xhtml(sel: &Selection) -> String {
    let mut writer = XhtmlWriter::default();
    if let Some(node) = sel.nodes().first() {
        writer.write_node(node);
    }
    writer.out
}

/// Serialize the children of the first node of `sel`.
#[must_use]
pub fn inner_xhtml(sel: &Selection) -> String {
    let mut writer = XhtmlWriter::default();
    if let Some(node) = sel.nodes().first() {
        for child in node.children() {
            writer.write_node(&child);
        }
    }
    writer.out
}

/// Escape text content for XML, dropping characters XML cannot represent.
#[must_use]
pub fn escape_text(s: &str) -> String {
    escape(s, false)
}

/// Escape an attribute value for a double-quoted XML attribute.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    escape(s, true)
}

fn escape(s: &str, quote: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().filter(|&c| is_xml_char(c)) {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quote => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn is_name_start_char(c: char) -> bool {
    matches!(
        c,
        'A'..='Z'
            | '_'
            | 'a'..='z'
            | '\u{C0}'..='\u{D6}'
            | '\u{D8}'..='\u{F6}'
            | '\u{F8}'..='\u{2FF}'
            | '\u{370}'..='\u{37D}'
            | '\u{37F}'..='\u{1FFF}'
            | '\u{200C}'..='\u{200D}'
            | '\u{2070}'..='\u{218F}'
            | '\u{2C00}'..='\u{2FEF}'
            | '\u{3001}'..='\u{D7FF}'
            | '\u{F900}'..='\u{FDCF}'
            | '\u{FDF0}'..='\u{FFFD}'
            | '\u{10000}'..='\u{EFFFF}'
    )
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(
            c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
        )
}

/// Name without a colon (XML Namespaces `NCName`).
fn is_ncname(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

/// Serializer state: output and the namespace prefixes currently in scope.
#[derive(Default)]
struct XhtmlWriter {
    out: String,
    prefixes: Vec<String>,
}

impl XhtmlWriter {
    fn write_node(&mut self, node: &NodeRef) {
        if node.is_text() {
            self.out.push_str(&escape_text(&node.text()));
        } else if node.is_element() {
            self.write_element(node);
        } else if !node.is_comment() {
            self.write_children(node);
        }
    }

    fn write_children(&mut self, node: &NodeRef) {
        for child in node.children() {
            self.write_node(&child);
        }
    }

    fn write_element(&mut self, node: &NodeRef) {
        let Some(name) = node.node_name() else {
            return;
        };

        let attrs: Vec<(String, String)> = node
            .attrs()
            .iter()
            .map(|attr| {
                let qname = match &attr.name.prefix {
                    Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", attr.name.local),
                    _ => attr.name.local.to_string(),
                };
                (qname, attr.value.to_string())
            })
            .collect();

        let scope_len = self.prefixes.len();
        self.prefixes.extend(
            attrs
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .filter_map(|(qname, _)| qname.strip_prefix("xmlns:"))
                .filter(|prefix| is_ncname(prefix))
                .map(str::to_string),
        );

        if self.is_writable_name(&name) {
            self.write_tag(&name, &attrs, node);
        } else {
            self.write_children(node);
        }

        self.prefixes.truncate(scope_len);
    }

    fn write_tag(&mut self, name: &str, attrs: &[(String, String)], node: &NodeRef) {
        self.out.push('<');
        self.out.push_str(name);
        for (qname, value) in attrs {
            if !self.is_writable_name(qname) {
                continue;
            }
            // an empty value cannot undeclare a prefix in XML 1.0
            if qname.starts_with("xmlns:") && value.is_empty() {
                continue;
            }
            let _ = write!(self.out, " {qname}=\"{}\"", escape_attr(value));
        }

        let children = node.children();
        let is_void = VOID_ELEMENTS.iter().any(|v| name.eq_ignore_ascii_case(v));
        if is_void || (children.is_empty() && self_closes_when_empty(name)) {
            self.out.push_str("/>");
            return;
        }

        self.out.push('>');
        for child in &children {
            self.write_node(child);
        }
        let _ = write!(self.out, "</{name}>");
    }

    /// A valid XML name whose prefix, if any, is bound.
    fn is_writable_name(&self, qname: &str) -> bool {
        match qname.split_once(':') {
            None => is_ncname(qname),
            Some((prefix, local)) => {
                is_ncname(prefix)
                    && is_ncname(local)
                    && (PREDECLARED_PREFIXES.contains(&prefix)
                        || self.prefixes.iter().any(|p| p == prefix))
            }
        }
    }
}

/// MathML and SVG leaves written as `<x/>` when empty. Empty HTML elements
/// keep their end tag.
fn self_closes_when_empty(name: &str) -> bool {
    matches!(
        name,
        "math" | "mi" | "mo" | "mn" | "ms" | "mtext" | "mspace" | "mrow" | "mglyph"
            | "malignmark" | "annotation" | "none" | "mprescripts" | "path" | "circle"
            | "rect" | "line" | "polyline" | "polygon" | "ellipse" | "use" | "stop"
    )
}
