//! Build command implementation

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use super::{emit, EmitArgs};
use crate::assembler::{build_spec_from_config, Mode};
use crate::config::Config;

/// Generate the production build spec
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Spec file, relative to the project root
    #[arg(short, long, default_value = "buildspec.json")]
    pub out: PathBuf,

    #[command(flatten)]
    pub emit: EmitArgs,
}

impl BuildCommand {
    pub fn execute(&self, config_path: &str) -> Result<()> {
        let start = Instant::now();

        info!("Loading configuration from {}", config_path);
        let config = Config::load_or_default(config_path)?;

        eprintln!("{} Discovering pages...", "→".blue());

        let assembly = build_spec_from_config(&config, Mode::Production)?;

        emit(&assembly, &config, &self.out, &self.emit, start)
    }
}
