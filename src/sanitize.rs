//! Removal of non-content elements from the parsed page.
//!
//! Three unconditional passes (tag names, class patterns, id patterns) strip
//! page chrome. Abstract and figure removal only run when enabled in
//! [`Options`]. Every pass detaches whole subtrees, so the passes can run in
//! any order with the same result.

use tracing::debug;

use crate::dom::{self, Document, Selection};
use crate::options::Options;
use crate::patterns::{
    ABSTRACT_ATTR, ABSTRACT_HEADING, BOILERPLATE_CLASS, BOILERPLATE_ID, FIGURE_CLASS,
    TAGS_TO_REMOVE,
};

/// Headings checked for an "Abstract" title.
const ABSTRACT_HEADING_TAGS: &str = "h1, h2, h3";

/// Containers removed together with an "Abstract" heading.
const ABSTRACT_CONTAINERS: &[&str] = &["section", "div"];

/// Clean the document in place.
pub fn clean(doc: &Document, opts: &Options) {
    remove_boilerplate(doc);

    if opts.remove_abstract {
        remove_abstract(doc);
    }

    if opts.remove_figures {
        remove_figures(doc);
    }
}

/// Remove structural tags and elements whose class or id looks like page chrome.
pub fn remove_boilerplate(doc: &Document) {
    let tags = doc.select(&TAGS_TO_REMOVE.join(", "));
    debug!(count = tags.length(), "removing non-content tags");
    dom::remove(&tags);

    let by_class = dom::find_all_by_attr(doc, "class", &BOILERPLATE_CLASS);
    debug!(count = by_class.len(), "removing boilerplate classes");
    dom::remove_all(&by_class);

    let by_id = dom::find_all_by_attr(doc, "id", &BOILERPLATE_ID);
    debug!(count = by_id.len(), "removing boilerplate ids");
    dom::remove_all(&by_id);
}

/// Remove the abstract.
///
/// Drops elements whose class or id mentions "abstract", then for each
/// `h1`-`h3` titled exactly "Abstract" drops its nearest enclosing
/// section/div, or the heading alone when it has none.
pub fn remove_abstract(doc: &Document) {
    let mut targets = dom::find_all_by_attr(doc, "class", &ABSTRACT_ATTR);
    targets.extend(dom::find_all_by_attr(doc, "id", &ABSTRACT_ATTR));
    dom::remove_all(&targets);

    let headings: Vec<Selection> = dom::each(&doc.select(ABSTRACT_HEADING_TAGS))
        .into_iter()
        .filter(|h| ABSTRACT_HEADING.is_match(h.text().trim()))
        .collect();

    for heading in headings {
        match dom::closest_ancestor(&heading, ABSTRACT_CONTAINERS) {
            Some(container) => dom::remove(&container),
            None => dom::remove(&heading),
        }
    }
}

/// Remove every `<figure>` and every element whose class mentions "figure".
///
/// The class match is a plain substring search, so it also catches elements
/// such as `ltx_figure_panel` wrappers or a `<span class="subfigure-ref">`.
pub fn remove_figures(doc: &Document) {
    dom::remove(&doc.select("figure"));
    dom::remove_all(&dom::find_all_by_attr(doc, "class", &FIGURE_CLASS));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(html: &str, opts: &Options) -> Document {
        let doc = dom::parse(html);
        clean(&doc, opts);
        doc
    }

    #[test]
    fn removes_structural_tags() {
        let doc = cleaned(
            r#"<html><head><style>p{}</style></head><body>
                <header>H</header><nav>N</nav><script>x()</script>
                <article><p>BODY</p><aside>SIDE</aside></article>
                <footer>F</footer></body></html>"#,
            &Options::default(),
        );

        for tag in TAGS_TO_REMOVE {
            assert!(doc.select(tag).is_empty(), "{tag} should be removed");
        }
        assert!(doc.select("p").exists());
    }

    #[test]
    fn removes_boilerplate_classes_and_ids() {
        let doc = cleaned(
            r#"<body>
                <div class="ltx_page_footer">F</div>
                <div class="Cookie-Notice">C</div>
                <div id="main-sidebar">S</div>
                <div class="ltx_para" id="p1">KEEP</div>
            </body>"#,
            &Options::default(),
        );

        assert_eq!(doc.select("div").length(), 1);
        assert!(doc.select("#p1").exists());
    }

    #[test]
    fn abstract_kept_by_default() {
        let html = r#"<body><section><h2>Abstract</h2><div>SUMMARY</div></section></body>"#;
        let doc = cleaned(html, &Options::default());
        assert!(doc.select("body").text().contains("SUMMARY"));
    }

    #[test]
    fn abstract_heading_container_removed() {
        let html = r#"<body>
            <section id="s0"><h2>Abstract</h2><div>SUMMARY</div></section>
            <section id="s1"><h2>Introduction</h2><p>INTRO</p></section>
        </body>"#;
        let opts = Options {
            remove_abstract: true,
            ..Options::default()
        };
        let doc = cleaned(html, &opts);

        let text = doc.select("body").text();
        assert!(!text.contains("SUMMARY"));
        assert!(text.contains("INTRO"));
    }

    #[test]
    fn abstract_heading_without_container_removed_alone() {
        let html = r#"<body><h2> abstract </h2><p>SUMMARY</p></body>"#;
        let opts = Options {
            remove_abstract: true,
            ..Options::default()
        };
        let doc = cleaned(html, &opts);

        assert!(doc.select("h2").is_empty());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn abstract_class_and_id_removed() {
        let html = r#"<body>
            <div class="ltx_abstract">A</div>
            <p id="Abstract-text">B</p>
            <p>KEEP</p>
        </body>"#;
        let opts = Options {
            remove_abstract: true,
            ..Options::default()
        };
        let doc = cleaned(html, &opts);

        assert_eq!(doc.select("body").text().trim(), "KEEP");
    }

    #[test]
    fn heading_mentioning_abstract_is_not_exact_match() {
        let html = r#"<body><div><h2>Abstract Algebra</h2><p>KEEP</p></div></body>"#;
        let opts = Options {
            remove_abstract: true,
            ..Options::default()
        };
        let doc = cleaned(html, &opts);
        assert!(doc.select("p").exists());
    }

    #[test]
    fn figures_kept_unless_enabled() {
        let html = r#"<body><figure class="ltx_figure"><img src="a.png"></figure></body>"#;
        let doc = cleaned(html, &Options::default());
        assert!(doc.select("figure").exists());
        assert!(doc.select("img").exists());
    }

    #[test]
    fn figures_and_figure_classes_removed() {
        let html = r#"<body>
            <figure><img src="a.png"></figure>
            <div class="ltx_figure_panel"><img src="b.png"></div>
            <span class="subfigure-ref">see 1a</span>
            <p>KEEP</p>
        </body>"#;
        let opts = Options {
            remove_figures: true,
            ..Options::default()
        };
        let doc = cleaned(html, &opts);

        assert!(doc.select("figure").is_empty());
        assert!(doc.select("img").is_empty());
        assert!(doc.select("span").is_empty());
        assert!(doc.select("p").exists());
    }
}
