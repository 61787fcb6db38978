//! EPUB packaging.
//!
//! Writes a single-chapter EPUB 3 book (with an EPUB 2 NCX for older readers)
//! from a [`Package`]. The container layout is:
//!
//! ```text
//! mimetype
//! META-INF/container.xml
//! EPUB/content.opf
//! EPUB/nav.xhtml
//! EPUB/toc.ncx
//! EPUB/content.xhtml
//! EPUB/style/nav.css
//! EPUB/images/...
//! ```

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::patterns::{MEDIA_TYPES, UNSAFE_FILENAME};
use crate::pipeline::Package;
use crate::xhtml::{escape_attr, escape_text};

/// Author recorded when the page names nobody.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// File name of the chapter inside the book.
pub const CHAPTER_FILE: &str = "content.xhtml";

/// File name of the stylesheet inside the book.
pub const STYLESHEET_FILE: &str = "style/nav.css";

/// Root folder of the publication inside the container.
const CONTENT_ROOT: &str = "EPUB";

/// Maximum length (characters) of a title-derived file name stem.
const MAX_FILE_STEM_CHARS: usize = 100;

/// Stylesheet linked from the chapter.
pub const STYLESHEET: &str = r#"@namespace epub "http://www.idpf.org/2007/ops";
@namespace m "http://www.w3.org/1998/Math/MathML";

body {
    font-family: Georgia, "Times New Roman", serif;
    margin: 5%;
    line-height: 1.6;
}
h1, h2, h3, h4, h5, h6 {
    font-weight: bold;
    margin-top: 1.5em;
    margin-bottom: 0.5em;
    color: #333;
}
h1 { font-size: 2em; }
h2 { font-size: 1.6em; }
h3 { font-size: 1.3em; }
p {
    text-align: justify;
    margin: 0.8em 0;
}
table {
    border-collapse: collapse;
    width: 100%;
    margin: 1.5em 0;
    font-size: 0.9em;
}
th, td {
    border: 1px solid #ddd;
    padding: 10px;
    text-align: left;
}
th {
    background-color: #f2f2f2;
    font-weight: bold;
}
img {
    max-width: 100%;
    height: auto;
    display: block;
    margin: 1em auto;
}
code, pre {
    font-family: "Courier New", monospace;
    background-color: #f4f4f4;
    padding: 2px 5px;
    border-radius: 3px;
}
pre {
    padding: 15px;
    overflow-x: auto;
}
m|math {
    display: inline-block;
}"#;

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="EPUB/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Writes [`Package`]s as EPUB files.
#[derive(Debug, Clone)]
pub struct EpubWriter {
    max_authors: usize,
    created: DateTime<Local>,
}

impl EpubWriter {
    /// Create a writer stamped with the current time.
    #[must_use]
    pub fn new(max_authors: usize) -> Self {
        Self {
            max_authors,
            created: Local::now(),
        }
    }

    /// Use a fixed creation time (identifier and modification date).
    #[must_use]
    pub fn with_timestamp(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    /// Book identifier derived from the creation time.
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("arxiv_{}", self.created.format("%Y%m%d%H%M%S"))
    }

    /// The single `dc:creator` written to the book.
    ///
    /// The author list is cut to `max_authors`, but only the first name of
    /// the cut list is recorded. With no authors at all, [`UNKNOWN_AUTHOR`]
    /// is used; with authors but `max_authors == 0`, nobody is.
    #[must_use]
    pub fn creator<'a>(&self, authors: &'a [String]) -> Option<&'a str> {
        if authors.is_empty() {
            return Some(UNKNOWN_AUTHOR);
        }
        authors
            .iter()
            .take(self.max_authors)
            .map(String::as_str)
            .next()
    }

    /// Write the book to `path`.
    ///
    /// A failure part-way may leave a truncated file behind.
    pub fn write_to_path(&self, package: &Package, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write(package, &mut writer)?;
        writer.flush()?;
        info!("EPUB written to {}", path.display());
        Ok(())
    }

    /// Write the book to any seekable writer.
    pub fn write<W: Write + Seek>(&self, package: &Package, writer: &mut W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // mimetype must come first, uncompressed
        zip.start_file("mimetype", stored)?;
        zip.write_all(b"application/epub+zip")?;

        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        let manifest = manifest_items(package);

        let entries = [
            ("content.opf", self.generate_opf(package, &manifest)),
            ("nav.xhtml", generate_nav(package)),
            ("toc.ncx", self.generate_ncx(package)),
            (CHAPTER_FILE, chapter_document(package)),
            (STYLESHEET_FILE, STYLESHEET.to_string()),
        ];
        for (name, text) in entries {
            zip.start_file(format!("{CONTENT_ROOT}/{name}"), deflated)?;
            zip.write_all(text.as_bytes())?;
        }

        for image in &package.images {
            debug!(path = %image.local_path, bytes = image.data.len(), "adding image");
            zip.start_file(format!("{CONTENT_ROOT}/{}", image.local_path), deflated)?;
            zip.write_all(&image.data)?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Generate content.opf.
    fn generate_opf(&self, package: &Package, manifest: &[ManifestItem]) -> String {
        let mut opf = String::new();

        opf.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="id" xml:lang="{lang}">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="id">{id}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:language>{lang}</dc:language>
"#,
            lang = escape_attr(&package.language),
            id = escape_text(&self.identifier()),
            title = escape_text(&package.title),
        ));

        if let Some(creator) = self.creator(&package.authors) {
            opf.push_str(&format!(
                "    <dc:creator id=\"creator\">{}</dc:creator>\n",
                escape_text(creator)
            ));
        }

        opf.push_str(&format!(
            "    <meta property=\"dcterms:modified\">{}</meta>\n",
            self.created.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%SZ")
        ));
        opf.push_str("  </metadata>\n");

        opf.push_str("  <manifest>\n");
        for item in manifest {
            opf.push_str(&format!(
                "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"",
                escape_attr(&item.id),
                escape_attr(&item.href),
                item.media_type
            ));
            if let Some(properties) = item.properties {
                opf.push_str(&format!(" properties=\"{properties}\""));
            }
            opf.push_str("/>\n");
        }
        opf.push_str("  </manifest>\n");

        opf.push_str("  <spine toc=\"ncx\">\n");
        opf.push_str("    <itemref idref=\"nav\"/>\n");
        opf.push_str("    <itemref idref=\"content\"/>\n");
        opf.push_str("  </spine>\n");
        opf.push_str("</package>\n");
        opf
    }

    /// Generate toc.ncx with a single navPoint.
    fn generate_ncx(&self, package: &Package) -> String {
        let title = escape_text(&package.title);
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content="{uid}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>{title}</text>
  </docTitle>
  <navMap>
    <navPoint id="content" playOrder="1">
      <navLabel><text>{title}</text></navLabel>
      <content src="{CHAPTER_FILE}"/>
    </navPoint>
  </navMap>
</ncx>
"#,
            uid = escape_attr(&self.identifier()),
        )
    }
}

struct ManifestItem {
    id: String,
    href: String,
    media_type: &'static str,
    properties: Option<&'static str>,
}

fn manifest_items(package: &Package) -> Vec<ManifestItem> {
    let mut items = vec![
        ManifestItem {
            id: "nav".to_string(),
            href: "nav.xhtml".to_string(),
            media_type: "application/xhtml+xml",
            properties: Some("nav"),
        },
        ManifestItem {
            id: "ncx".to_string(),
            href: "toc.ncx".to_string(),
            media_type: "application/x-dtbncx+xml",
            properties: None,
        },
        ManifestItem {
            id: "content".to_string(),
            href: CHAPTER_FILE.to_string(),
            media_type: "application/xhtml+xml",
            // EPUB 3 requires this on documents embedding MathML
            properties: package.has_mathml.then_some("mathml"),
        },
        ManifestItem {
            id: "style_nav".to_string(),
            href: STYLESHEET_FILE.to_string(),
            media_type: "text/css",
            properties: None,
        },
    ];

    items.extend(
        package
            .images
            .iter()
            .enumerate()
            .map(|(i, image)| ManifestItem {
                id: format!("image_{}", i + 1),
                href: image.local_path.clone(),
                media_type: media_type(&image.local_path),
                properties: None,
            }),
    );

    items
}

/// Wrap the content fragment in the chapter's XHTML shell.
#[must_use]
pub fn chapter_document(package: &Package) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xmlns:m="http://www.w3.org/1998/Math/MathML" lang="{lang}" xml:lang="{lang}">
<head>
    <title>{title}</title>
    <link rel="stylesheet" href="{STYLESHEET_FILE}" type="text/css"/>
</head>
<body>
    {content}
</body>
</html>
"#,
        lang = escape_attr(&package.language),
        title = escape_text(&package.title),
        content = package.content,
    )
}

/// Generate the EPUB 3 navigation document.
fn generate_nav(package: &Package) -> String {
    let title = escape_text(&package.title);
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" lang="{lang}" xml:lang="{lang}">
<head>
    <title>{title}</title>
</head>
<body>
    <nav epub:type="toc" id="toc" role="doc-toc">
        <h2>{title}</h2>
        <ol>
            <li><a href="{CHAPTER_FILE}">{title}</a></li>
        </ol>
    </nav>
</body>
</html>
"#,
        lang = escape_attr(&package.language),
    )
}

/// Media type of an embedded file, from its extension.
#[must_use]
pub fn media_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map_or("application/octet-stream", |(_, mime)| *mime)
}

/// Output file name derived from the book title.
///
/// Characters that are unsafe in file names become `_`, and the stem is cut
/// to 100 characters.
#[must_use]
pub fn default_output_path(title: &str) -> PathBuf {
    let safe = UNSAFE_FILENAME.replace_all(title, "_");
    let stem: String = safe.chars().take(MAX_FILE_STEM_CHARS).collect();
    PathBuf::from(format!("{}.epub", stem.trim()))
}
