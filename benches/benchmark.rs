//! Performance benchmarks for arxiv-epub.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks cover the network-free stages on a synthetic paper page:
//! - Full conversion of a small page (sanitize, metadata, MathML, XHTML)
//! - MathML normalization alone on pages of growing size
//! - EPUB serialization into memory

use std::io::Cursor;
use std::time::Duration;

use arxiv_epub::{convert_html, dom, mathml, EpubWriter, Error, Fetch, Options, Response};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const PAGE_URL: &str = "https://arxiv.org/html/2401.00001v1";

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Paper</title>
    <meta name="citation_author" content="Jane Doe">
    <meta name="citation_author" content="John Roe">
</head>
<body>
    <nav class="ltx_page_navbar"><a href="/">Home</a></nav>
    <div class="ltx_page_main">
        <h1 class="ltx_title">Sample Paper Title</h1>
        <div class="ltx_abstract"><h6>Abstract</h6><p>We study things.</p></div>
        <section class="ltx_section">
            <h2>Introduction</h2>
            <p>Let <math alttext="x^2" display="inline" class="ltx_Math">
                <semantics><msup><mi>x</mi><mn>2</mn></msup>
                <annotation encoding="application/x-tex">x^2</annotation></semantics>
            </math> be given.</p>
            <figure class="ltx_figure"><figcaption>Figure 1</figcaption></figure>
        </section>
    </div>
    <footer>Copyright</footer>
</body>
</html>
"#;

/// Refuses every request so benchmarks never touch the network.
struct Offline;

impl Fetch for Offline {
    fn get(&self, url: &str, _timeout: Duration) -> arxiv_epub::Result<Response> {
        Err(Error::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}

fn paper_with_sections(sections: usize) -> String {
    let mut body = String::new();
    for i in 0..sections {
        body.push_str(&format!(
            r#"<section><h2>Section {i}</h2><p>Text <math onclick="f()" class="ltx_Math"><mrow><mi mathvariant="normal" data-id="{i}">a</mi><mo>=</mo><mn>{i}</mn></mrow></math>.</p></section>"#
        ));
    }
    format!("<html><body><article>{body}</article></body></html>")
}

fn bench_convert_default(c: &mut Criterion) {
    let options = Options::default();
    c.bench_function("convert_default", |b| {
        b.iter(|| convert_html(black_box(SAMPLE_HTML), PAGE_URL, &options, &Offline));
    });
}

fn bench_convert_with_removals(c: &mut Criterion) {
    let options = Options {
        remove_abstract: true,
        remove_figures: true,
        ..Options::default()
    };

    c.bench_function("convert_with_removals", |b| {
        b.iter(|| convert_html(black_box(SAMPLE_HTML), PAGE_URL, black_box(&options), &Offline));
    });
}

fn bench_mathml_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("mathml_normalize");

    for sections in [10, 100, 500] {
        let html = paper_with_sections(sections);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::new("sections", sections), &html, |b, html| {
            b.iter(|| {
                let doc = dom::parse(html);
                mathml::normalize(&doc.select("body"))
            });
        });
    }

    group.finish();
}

fn bench_epub_write(c: &mut Criterion) {
    let options = Options::default();
    let Ok(package) = convert_html(&paper_with_sections(100), PAGE_URL, &options, &Offline) else {
        return;
    };
    let writer = EpubWriter::new(options.max_authors);

    c.bench_function("epub_write", |b| {
        b.iter(|| {
            let mut buffer = Cursor::new(Vec::new());
            writer.write(black_box(&package), &mut buffer)
        });
    });
}

criterion_group!(
    benches,
    bench_convert_default,
    bench_convert_with_removals,
    bench_mathml_normalize,
    bench_epub_write
);
criterion_main!(benches);
