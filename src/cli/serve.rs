//! Serve command implementation
//!
//! Produces the development spec. The dev server itself belongs to the
//! bundler; its settings are carried through unchanged.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use super::{emit, EmitArgs};
use crate::assembler::{build_spec_from_config, Mode};
use crate::config::Config;

/// Generate the development build spec
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Spec file, relative to the project root
    #[arg(short, long, default_value = "buildspec.dev.json")]
    pub out: PathBuf,

    /// Port for the dev server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Disable hot module replacement
    #[arg(long)]
    pub no_hot: bool,

    #[command(flatten)]
    pub emit: EmitArgs,
}

impl ServeCommand {
    pub fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let mut config = Config::load_or_default(config_path)?;
        self.apply_overrides(&mut config);

        eprintln!(
            "{} Discovering pages for dev server on port {}...",
            "→".blue(),
            config.dev.port.to_string().cyan()
        );

        let assembly = build_spec_from_config(&config, Mode::Development)?;

        emit(&assembly, &config, &self.out, &self.emit, start)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(port) = self.port {
            config.dev.port = port;
        }
        if self.open {
            config.dev.open = true;
        }
        if self.no_hot {
            config.dev.hot = false;
        }
    }
}
