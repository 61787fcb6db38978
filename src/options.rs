//! Configuration options for a conversion run.
//!
//! The `Options` struct is built once (usually from the command line) and
//! passed by reference to every stage. No stage mutates it.

use std::time::Duration;

/// Configuration options for a conversion run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use arxiv_epub::Options;
///
/// let options = Options {
///     remove_abstract: true,
///     max_image_width: None,
///     ..Options::default()
/// };
/// assert_eq!(options.max_authors, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Remove the abstract section from the chapter.
    ///
    /// Default: `false`
    pub remove_abstract: bool,

    /// Remove every figure, and every element whose class mentions "figure".
    ///
    /// Default: `false`
    pub remove_figures: bool,

    /// Cap embedded images to this width (pixels) with an inline style.
    ///
    /// `None` leaves images unstyled.
    ///
    /// Default: `Some(800)`
    pub max_image_width: Option<u32>,

    /// Timeout for the page download. Image downloads use a fixed shorter one.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// Only report errors.
    ///
    /// Default: `false`
    pub quiet: bool,

    /// Number of authors considered for the book metadata.
    ///
    /// Default: `4`
    pub max_authors: usize,
}

impl Options {
    /// Tracing filter directive matching the `quiet` setting.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            remove_abstract: false,
            remove_figures: false,
            max_image_width: Some(800),
            timeout: Duration::from_secs(30),
            quiet: false,
            max_authors: 4,
        }
    }
}
