//! Project initialization command

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::config::DEFAULT_CONFIG;

/// Initialize a new multi-page project
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Project name / directory
    #[arg(default_value = ".")]
    pub name: String,

    /// Pages to scaffold
    #[arg(short, long, value_delimiter = ',', default_value = "index,about")]
    pub pages: Vec<String>,
}

impl InitCommand {
    pub fn execute(&self) -> Result<()> {
        let project_dir = Path::new(&self.name);

        eprintln!("{} Initializing new multi-page project...\n", "→".blue());

        // Create project directory if needed
        if self.name != "." {
            fs::create_dir_all(project_dir)
                .context("Failed to create project directory")?;
        }

        let config_path = project_dir.join(DEFAULT_CONFIG);
        if config_path.exists() {
            anyhow::bail!("{} already exists in {}", DEFAULT_CONFIG, project_dir.display());
        }

        fs::write(&config_path, self.generate_config())
            .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG))?;
        eprintln!("  {} Created {}", "✓".green(), DEFAULT_CONFIG.cyan());

        for page in &self.pages {
            self.generate_page(project_dir, page)?;
        }

        eprintln!(
            "\n{} Project initialized successfully!\n",
            "✓".green().bold()
        );

        eprintln!("  Next steps:");
        if self.name != "." {
            eprintln!("    {} cd {}", "→".dimmed(), self.name.cyan());
        }
        eprintln!("    {} pagemap pages", "→".dimmed());
        eprintln!("    {} pagemap build", "→".dimmed());
        eprintln!();

        Ok(())
    }

    fn project_name(&self) -> &str {
        if self.name == "." {
            return "my-app";
        }
        Path::new(&self.name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("my-app")
    }

    fn generate_config(&self) -> String {
        format!(
            r#"[project]
name = "{}"
version = "0.1.0"

[pages]
root = "src/pages"
entry = ["index.js"]
template = ["index.html"]

[output]
dir = "dist"
filename = "js/[name].[contenthash:8].js"
naming = "sanitize"

[policy]
duplicates = "error"
orphans = "warn"

[[rules]]
test = '\.css$'
use = ["style-loader", "css-loader"]

[dev]
port = 8080
hot = true
"#,
            self.project_name()
        )
    }

    /// Write one page directory: script, template and stylesheet
    fn generate_page(&self, project_dir: &Path, page: &str) -> Result<()> {
        let page_dir = project_dir.join("src/pages").join(page);
        fs::create_dir_all(&page_dir)
            .with_context(|| format!("Failed to create {}", page_dir.display()))?;

        let files = [
            ("index.js", format!("import './index.css';\n\ndocument.querySelector('#app').textContent = '{}';\n", page)),
            ("index.html", self.generate_index_html(page)),
            ("index.css", "#app {\n  font-family: sans-serif;\n}\n".to_string()),
        ];

        for (name, content) in files {
            fs::write(page_dir.join(name), content)
                .with_context(|| format!("Failed to write {}/{}", page, name))?;
        }

        eprintln!("  {} Created page {}", "✓".green(), page.cyan());

        Ok(())
    }

    fn generate_index_html(&self, page: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>{} - {}</title>
  </head>
  <body>
    <div id="app"></div>
  </body>
</html>
"#,
            self.project_name(),
            page
        )
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::assembler::{build_spec_from_config, Mode};
    use crate::config::Config;

    #[test]
    fn test_scaffold_builds_clean_spec() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("site");
        let cmd = InitCommand {
            name: project.display().to_string(),
            pages: vec!["index".to_string(), "about".to_string()],
        };
        cmd.execute().unwrap();

        let config = Config::load(project.join(DEFAULT_CONFIG)).unwrap();
        assert_eq!(config.project.name, "site");

        let assembly = build_spec_from_config(&config, Mode::Production).unwrap();
        assert_eq!(assembly.spec.entry.len(), 2);
        assert_eq!(assembly.spec.html.len(), 2);
        assert!(assembly.diagnostics.is_empty());
    }

    #[test]
    fn test_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), "").unwrap();
        let cmd = InitCommand {
            name: dir.path().display().to_string(),
            pages: vec!["index".to_string()],
        };
        assert!(cmd.execute().is_err());
    }
}
