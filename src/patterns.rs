//! Compiled regex patterns and static tables used by the conversion stages.
//!
//! All patterns are compiled once at first use with `LazyLock`.
//! Class and id patterns are searched (not anchored) and case-insensitive.

#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Boilerplate Removal
// =============================================================================

/// Tags that never carry paper content.
pub const TAGS_TO_REMOVE: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "iframe", "noscript",
];

/// Class names indicating page chrome.
pub const BOILERPLATE_CLASSES: &[&str] = &[
    "navigation",
    "nav-bar",
    "menu",
    "sidebar",
    "header",
    "footer",
    "ads",
    "advertisement",
    "social-share",
    "comments",
    "cookie-notice",
];

/// Id values indicating page chrome.
pub const BOILERPLATE_IDS: &[&str] = &["header", "footer", "nav", "navigation", "sidebar"];

/// Matches a class attribute containing any boilerplate class name.
pub static BOILERPLATE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| alternation(BOILERPLATE_CLASSES).expect("BOILERPLATE_CLASS regex"));

/// Matches an id attribute containing any boilerplate id.
pub static BOILERPLATE_ID: LazyLock<Regex> =
    LazyLock::new(|| alternation(BOILERPLATE_IDS).expect("BOILERPLATE_ID regex"));

/// Matches class/id values of abstract containers.
pub static ABSTRACT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)abstract").expect("ABSTRACT_ATTR regex"));

/// Matches a heading whose whole text is "Abstract".
pub static ABSTRACT_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^abstract$").expect("ABSTRACT_HEADING regex"));

/// Matches class values of figure wrappers.
pub static FIGURE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)figure").expect("FIGURE_CLASS regex"));

// =============================================================================
// Content Region
// =============================================================================

/// Matches id/class values of the main content container.
pub static CONTENT_REGION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)content|main|article|paper").expect("CONTENT_REGION regex")
});

// =============================================================================
// Metadata
// =============================================================================

/// Matches class values of author elements.
pub static AUTHOR_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)author").expect("AUTHOR_CLASS regex"));

/// Characters dropped from author names.
pub static AUTHOR_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-.,]").expect("AUTHOR_DISALLOWED regex"));

/// Matches runs of whitespace for normalization.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

/// Characters not allowed in output file names.
pub static UNSAFE_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("UNSAFE_FILENAME regex"));

// =============================================================================
// MathML
// =============================================================================

/// MathML namespace URI.
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Attributes kept on MathML elements. Anything else (except `aria-*`) is dropped.
pub static MATHML_ALLOWED_ATTRIBUTES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "accent", "accentunder", "align", "alignmentscope", "altimg",
        "altimg-height", "altimg-valign", "altimg-width", "bevelled",
        "cdgroup", "charalign", "charspacing", "class", "close", "columnalign",
        "columnlines", "columnspacing", "columnspan", "columnwidth",
        "crossout", "decimalpoint", "denomalign", "depth", "dir",
        "displaystyle", "edge", "equalcolumns", "equalrows", "fence",
        "form", "frame", "framespacing", "groupalign", "height", "href",
        "id", "indentalign", "indentalignfirst", "indentalignlast",
        "indentshift", "indentshiftfirst", "indentshiftlast", "indenttarget",
        "infixlinebreakstyle", "largeop", "leftoverhang", "length",
        "linebreak", "linebreakmultchar", "linebreakstyle", "lineleading",
        "linethickness", "location", "longdivstyle", "lquote", "lspace",
        "macros", "mathbackground", "mathcolor", "mathsize", "mathvariant",
        "maxsize", "maxwidth", "minlabelspacing", "minsize", "mode",
        "movablelimits", "mslinethickness", "notation", "numalign", "open",
        "other", "overflow", "position", "rightoverhang", "rowalign",
        "rowlines", "rowspacing", "rowspan", "rquote", "rspace",
        "scriptlevel", "scriptminsize", "scriptsizemultiplier", "selection",
        "separator", "separators", "shift", "side", "stackalign", "stretchy",
        "style", "subscriptshift", "superscriptshift", "symmetric", "valign",
        "width", "xmlns",
    ]
    .into_iter()
    .collect()
});

// =============================================================================
// Images
// =============================================================================

/// Path suffixes accepted as image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp"];

/// Image content types and the extension they map to.
pub const IMAGE_CONTENT_TYPES: &[(&str, &str)] = &[
    ("image/png", ".png"),
    ("image/jpeg", ".jpg"),
    ("image/gif", ".gif"),
    ("image/svg+xml", ".svg"),
    ("image/webp", ".webp"),
];

/// Media types of embedded resources, keyed by lowercase extension.
pub const MEDIA_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
];

/// Build a case-insensitive alternation of literal words.
fn alternation(words: &[&str]) -> Result<Regex, regex::Error> {
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    Regex::new(&format!("(?i){}", escaped.join("|")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boilerplate_class_is_substring_search() {
        assert!(BOILERPLATE_CLASS.is_match("main-menu"));
        assert!(BOILERPLATE_CLASS.is_match("ltx_page_FOOTER"));
        assert!(BOILERPLATE_CLASS.is_match("cookie-notice-banner"));
        assert!(!BOILERPLATE_CLASS.is_match("ltx_para"));
    }

    #[test]
    fn boilerplate_id_matches_partial_ids() {
        assert!(BOILERPLATE_ID.is_match("page-header"));
        assert!(BOILERPLATE_ID.is_match("Sidebar1"));
        assert!(!BOILERPLATE_ID.is_match("S1.SS2"));
    }

    #[test]
    fn abstract_heading_requires_exact_text() {
        assert!(ABSTRACT_HEADING.is_match("Abstract"));
        assert!(ABSTRACT_HEADING.is_match("ABSTRACT"));
        assert!(!ABSTRACT_HEADING.is_match("Abstract Interpretation"));
    }

    #[test]
    fn author_cleaning_patterns() {
        let cleaned = AUTHOR_DISALLOWED.replace_all("Jane Doe* (MIT)", "");
        assert_eq!(cleaned, "Jane Doe MIT");
        assert_eq!(WHITESPACE_NORMALIZE.replace_all("a \n\t b", " "), "a b");
    }

    #[test]
    fn mathml_allow_list_contents() {
        assert!(MATHML_ALLOWED_ATTRIBUTES.contains("mathvariant"));
        assert!(MATHML_ALLOWED_ATTRIBUTES.contains("xmlns"));
        assert!(MATHML_ALLOWED_ATTRIBUTES.contains("class"));
        assert!(!MATHML_ALLOWED_ATTRIBUTES.contains("onclick"));
        assert!(!MATHML_ALLOWED_ATTRIBUTES.contains("data-latex"));
    }

    #[test]
    fn unsafe_filename_characters() {
        assert_eq!(UNSAFE_FILENAME.replace_all(r#"a/b:c?"d""#, "_"), "a_b_c__d_");
    }
}
