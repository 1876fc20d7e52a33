//! Pages command implementation

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::assembler::{Assembler, BundlerOptions, Mode};
use crate::config::{Config, OrphanPolicy};

/// List discovered pages
#[derive(Args, Debug)]
pub struct PagesCommand {}

impl PagesCommand {
    pub fn execute(&self, config_path: &str) -> Result<()> {
        info!("Loading configuration from {}", config_path);
        let config = Config::load_or_default(config_path)?;
        let layout = config.layout();

        let assembly = Assembler::new(&layout)
            .naming(config.naming())
            .duplicates(config.policy.duplicates)
            .orphans(OrphanPolicy::Warn)
            .assemble(BundlerOptions::from_config(&config, Mode::Production))?;

        let pages = assembly.spec.pages();
        if pages.is_empty() {
            eprintln!("{} No pages found in {}\n", "⚠".yellow(), config.pages.root.cyan());
            return Ok(());
        }

        for page in &pages {
            let entry = match &page.entry {
                Some(path) => path.dimmed().to_string(),
                None => "no entry script".yellow().to_string(),
            };
            let output = match &page.output {
                Some(filename) => filename.cyan().to_string(),
                None => "no template".yellow().to_string(),
            };

            let mark = if page.entry.is_some() && page.template.is_some() {
                "✓".green()
            } else {
                "⚠".yellow()
            };

            eprintln!("  {} {} {} {} {}", mark, page.id.as_str().bold(), entry, "→".dimmed(), output);
        }

        for warning in &assembly.diagnostics {
            eprintln!("  {} {}", "⚠".yellow(), warning);
        }

        eprintln!();

        Ok(())
    }
}
