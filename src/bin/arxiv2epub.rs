//! arxiv2epub - convert an arXiv HTML paper into an EPUB book

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use arxiv_epub::{convert_url, epub, write_epub, Options};

#[derive(Parser)]
#[command(name = "arxiv2epub")]
#[command(version, about = "Convert arXiv HTML papers to EPUB", long_about = None)]
#[command(after_help = "EXAMPLES:
    arxiv2epub https://arxiv.org/html/2401.00001
    arxiv2epub https://arxiv.org/html/2401.00001 -o paper.epub --no-abstract")]
struct Cli {
    /// URL of the arXiv HTML paper
    #[arg(value_name = "URL")]
    url: String,

    /// Output EPUB file (default: derived from the paper title)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Remove the abstract section
    #[arg(long)]
    no_abstract: bool,

    /// Remove all figures
    #[arg(long)]
    remove_figures: bool,

    /// Maximum image width in pixels (0 disables the limit)
    #[arg(long, value_name = "PIXELS", default_value_t = 800)]
    max_image_width: u32,

    /// Maximum number of authors considered for the metadata
    #[arg(long, value_name = "N", default_value_t = 4)]
    max_authors: usize,

    /// Page download timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    timeout: u64,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            remove_abstract: self.no_abstract,
            remove_figures: self.remove_figures,
            max_image_width: (self.max_image_width > 0).then_some(self.max_image_width),
            timeout: Duration::from_secs(self.timeout),
            quiet: self.quiet,
            max_authors: self.max_authors,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.options();
    init_tracing(&options);

    match run(&cli, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, options: &Options) -> arxiv_epub::Result<()> {
    let package = convert_url(&cli.url, options)?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| epub::default_output_path(&package.title));
    write_epub(&package, &output, options)?;

    if !options.quiet {
        println!("Successfully created EPUB: {}", output.display());
        println!("Images included: {}", package.images.len());
        println!(
            "MathML detected: {}",
            if package.has_mathml { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn init_tracing(options: &Options) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let cli = Cli::parse_from(["arxiv2epub", "https://arxiv.org/html/1"]);
        assert_eq!(cli.options(), Options::default());
        assert!(cli.output.is_none());
    }

    #[test]
    fn zero_width_disables_limit() {
        let cli = Cli::parse_from([
            "arxiv2epub",
            "https://arxiv.org/html/1",
            "--max-image-width",
            "0",
            "--no-abstract",
            "--remove-figures",
            "--timeout",
            "5",
            "-o",
            "out.epub",
        ]);
        let options = cli.options();
        assert_eq!(options.max_image_width, None);
        assert!(options.remove_abstract);
        assert!(options.remove_figures);
        assert_eq!(options.timeout, Duration::from_secs(5));
        assert_eq!(cli.output, Some(PathBuf::from("out.epub")));
    }
}
