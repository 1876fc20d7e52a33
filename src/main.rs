//! Pagemap - multi-page bundler configuration generator
//!
//! Scans a pages directory where every subdirectory is one page and emits
//! the bundler configuration for all of them.
//!
//! # Features
//! - Entry map derived from each page's script
//! - Template bindings restricted to the page's own chunk
//! - Duplicate and orphan page detection
//! - Reproducible, fingerprinted build specs

use anyhow::Result;
use clap::Parser;
use pagemap_lib::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pagemap_lib=debug,pagemap=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pagemap_lib=info,pagemap=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    cli.execute()
}
