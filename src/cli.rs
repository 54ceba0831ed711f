//! Command-line interface definitions for docs_routes.
//!
//! All paths are resolved against the docs root, which can also be supplied
//! through the `DOCS_DIR` environment variable.

use clap::Parser;
use std::path::PathBuf;

/// Platforms synchronized when none are given on the command line.
pub const DEFAULT_PLATFORMS: [&str; 2] = ["new-expensify", "expensify-classic"];

/// Regenerate `routes.yml` from `_routes.yml` and the markdown article tree.
///
/// # Examples
///
/// ```sh
/// # Rebuild docs/_data/routes.yml from the current directory
/// docs_routes
///
/// # Point at another checkout
/// docs_routes --docs-dir ../App/docs
///
/// # Fail in CI when routes.yml was not regenerated
/// docs_routes --check
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root of the docs tree (contains `_data/` and `articles/`)
    #[arg(short, long, env = "DOCS_DIR", default_value = "docs")]
    pub docs_dir: PathBuf,

    /// Hand-maintained manifest, relative to the docs root
    #[arg(short, long, default_value = "_data/_routes.yml")]
    pub input: PathBuf,

    /// Generated manifest, relative to the docs root
    #[arg(short, long, default_value = "_data/routes.yml")]
    pub output: PathBuf,

    /// Platform to synchronize; repeat for several
    #[arg(short, long = "platform", default_values_t = DEFAULT_PLATFORMS.map(String::from))]
    pub platforms: Vec<String>,

    /// Compare the generated manifest with the existing output instead of writing it
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    pub fn input_path(&self) -> PathBuf {
        self.docs_dir.join(&self.input)
    }

    pub fn output_path(&self) -> PathBuf {
        self.docs_dir.join(&self.output)
    }

    /// `<docs>/articles`, the parent of every platform directory.
    pub fn articles_dir(&self) -> PathBuf {
        self.docs_dir.join("articles")
    }
}
