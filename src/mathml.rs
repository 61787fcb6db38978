//! MathML normalization.
//!
//! EPUB readers only accept MathML islands that declare their namespace and
//! carry MathML attributes. Every `<math>` element gets an `xmlns`, and any
//! attribute outside the allow-list (other than `aria-*`) is removed from the
//! element and all of its descendants. Element structure is left alone.

use tracing::debug;

use crate::dom::{self, Selection};
use crate::patterns::{MATHML_ALLOWED_ATTRIBUTES, MATHML_NAMESPACE};

/// Outcome of a normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MathReport {
    /// Number of `<math>` elements found.
    pub islands: usize,

    /// Number of attributes removed.
    pub removed_attributes: usize,

    /// Number of namespace declarations added.
    pub namespaces_added: usize,
}

impl MathReport {
    /// Whether the content contains MathML.
    #[must_use]
    pub fn has_mathml(&self) -> bool {
        self.islands > 0
    }
}

/// Check whether an attribute may stay on a MathML element.
#[must_use]
pub fn is_allowed_attribute(name: &str) -> bool {
    MATHML_ALLOWED_ATTRIBUTES.contains(name) || name.starts_with("aria-")
}

/// Normalize every MathML island under `root`.
pub fn normalize(root: &Selection) -> MathReport {
    let mut report = MathReport::default();

    for math in dom::each(&root.select("math")) {
        report.islands += 1;

        if dom::get_attribute(&math, "xmlns").is_none_or(|ns| ns.is_empty()) {
            dom::set_attribute(&math, "xmlns", MATHML_NAMESPACE);
            report.namespaces_added += 1;
        }

        report.removed_attributes += prune_attributes(&math);
        for descendant in dom::each(&math.select("*")) {
            report.removed_attributes += prune_attributes(&descendant);
        }
    }

    debug!(?report, "normalized MathML");
    report
}

/// Remove disallowed attributes from one element, returning how many went.
fn prune_attributes(el: &Selection) -> usize {
    let mut removed = 0;
    for name in dom::attribute_names(el) {
        if !is_allowed_attribute(&name) {
            dom::remove_attribute(el, &name);
            removed += 1;
        }
    }
    removed
}
