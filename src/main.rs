//! # docs_routes
//!
//! Regenerates the help site's navigation manifest from the markdown article
//! tree. The hand-maintained `_routes.yml` declares platforms and their hubs;
//! this tool walks `docs/articles/<platform>/<hub>/` and writes `routes.yml`
//! with every hub's articles and sections filled in.
//!
//! ## Usage
//!
//! ```sh
//! docs_routes --docs-dir ./docs
//! docs_routes --check   # exit 1 if routes.yml is stale
//! ```
//!
//! ## Architecture
//!
//! 1. **Load**: parse `_data/_routes.yml`
//! 2. **Validate**: hub directories on disk must match the declared hubs, per platform
//! 3. **Scan**: markdown files become articles, subdirectories become sections
//! 4. **Output**: write `_data/routes.yml` behind an auto-generation disclaimer
//!
//! Any failure exits with status 1 and leaves the output untouched.

use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod error;
mod models;
mod outputs;
mod scanner;
mod sync;
mod utils;

use cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(docs_dir = %args.docs_dir.display(), platforms = ?args.platforms, check = args.check, "Parsed CLI arguments");

    match sync::run(&args).await {
        Ok(report) => {
            let elapsed = start_time.elapsed();
            info!(
                path = %report.output.display(),
                hubs = report.hubs,
                sections = report.sections,
                articles = report.articles,
                written = report.written,
                millis = elapsed.as_millis() as u64,
                "Routes manifest up to date"
            );
            ExitCode::SUCCESS
        }
        Err(e) if e.is_io() => {
            error!(error = %e, "A problem occurred while trying to read the directories.");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Failed to generate routes manifest");
            ExitCode::FAILURE
        }
    }
}
