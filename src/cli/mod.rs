//! Command-line interface for Pagemap
//!
//! Provides the main CLI structure using clap with subcommands for:
//! - `build`: Production build spec
//! - `serve`: Development build spec with dev-server settings
//! - `pages`: List discovered pages
//! - `init`: Project scaffolding

mod build;
mod init;
mod pages;
mod serve;

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::assembler::Assembly;
use crate::config::{Config, DEFAULT_CONFIG};
use crate::utils::{format_duration, format_size};

pub use build::BuildCommand;
pub use init::InitCommand;
pub use pages::PagesCommand;
pub use serve::ServeCommand;

/// Pagemap - derives multi-page bundler configuration from a pages directory
#[derive(Parser, Debug)]
#[command(name = "pagemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to pagemap.toml config file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the production build spec
    Build(BuildCommand),

    /// Generate the development build spec, including dev-server settings
    Serve(ServeCommand),

    /// List discovered pages
    Pages(PagesCommand),

    /// Initialize a new multi-page project
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        print_banner();

        match &self.command {
            Commands::Build(cmd) => cmd.execute(&self.config),
            Commands::Serve(cmd) => cmd.execute(&self.config),
            Commands::Pages(cmd) => cmd.execute(&self.config),
            Commands::Init(cmd) => cmd.execute(),
        }
    }
}

/// Where a generated spec goes
#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Print the build spec to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Compare against the existing spec file and fail if it is out of date
    #[arg(long, conflicts_with = "stdout")]
    pub check: bool,
}

/// Write, print or verify an assembled spec
pub(crate) fn emit(assembly: &Assembly, config: &Config, out: &Path, args: &EmitArgs, start: Instant) -> Result<()> {
    let json = assembly.spec.to_json().context("Failed to serialize build spec")?;
    let fingerprint = assembly.spec.fingerprint().context("Failed to fingerprint build spec")?;
    let target = config.root.join(out);

    if args.stdout {
        println!("{}", json);
    } else if args.check {
        let existing = fs::read_to_string(&target)
            .with_context(|| format!("Failed to read {}", target.display()))?;
        if existing.trim_end() != json {
            anyhow::bail!(
                "{} is out of date (expected fingerprint {})",
                target.display(),
                fingerprint
            );
        }
        eprintln!("{} {} is up to date", "✓".green().bold(), target.display().to_string().cyan());
    } else {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&target, format!("{}\n", json))
            .with_context(|| format!("Failed to write build spec: {}", target.display()))?;
        eprintln!(
            "  {} {} {}",
            "•".dimmed(),
            target.display().to_string().cyan(),
            format_size(json.len() + 1).dimmed()
        );
    }

    let pages = assembly.spec.pages();
    eprintln!(
        "\n{} {} page(s), {} entr{}, {} template(s) in {} {}\n",
        "✓".green().bold(),
        pages.len(),
        assembly.spec.entry.len(),
        if assembly.spec.entry.len() == 1 { "y" } else { "ies" },
        assembly.spec.html.len(),
        format_duration(start.elapsed()),
        format!("[{}]", fingerprint).dimmed()
    );

    if !assembly.diagnostics.is_empty() {
        eprintln!(
            "  {} {} warning(s), run with {} for details\n",
            "⚠".yellow(),
            assembly.diagnostics.len(),
            "pagemap pages".cyan()
        );
    }

    Ok(())
}

/// Print the Pagemap banner
fn print_banner() {
    eprintln!(
        "\n{} {} {}\n",
        "⚡".cyan(),
        "Pagemap".bold().cyan(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
