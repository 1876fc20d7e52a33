//! Configuration handling for Pagemap
//!
//! Parses and manages pagemap.toml configuration files.

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::binder::NamingRule;
use crate::resolver::{build_globset, PagesLayout};

pub use schema::*;

/// Default config file name
pub const DEFAULT_CONFIG: &str = "pagemap.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project metadata
    #[serde(default)]
    pub project: ProjectConfig,

    /// Pages tree layout
    #[serde(default)]
    pub pages: PagesConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Duplicate and orphan handling
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Static file-type rules
    #[serde(default = "default_rules")]
    pub rules: Vec<RuleConfig>,

    /// Development server settings
    #[serde(default)]
    pub dev: DevConfig,

    /// Root directory (computed from config file location)
    #[serde(skip)]
    pub root: PathBuf,
}

impl Config {
    /// Load configuration from a file path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let canonical_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let content = fs::read_to_string(&canonical_path)
            .with_context(|| format!("Failed to read config file: {}", canonical_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", canonical_path.display()))?;

        // Set root directory to the directory containing the config file
        config.root = canonical_path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        config.validate()?;

        Ok(config)
    }

    /// Load the config file, or fall back to defaults rooted at the current
    /// directory when the default file name is absent
    pub fn load_or_default(path: &str) -> Result<Self> {
        if path == DEFAULT_CONFIG && !Path::new(path).exists() {
            debug!("No {} found, using defaults", DEFAULT_CONFIG);
            let mut config = Self::default_config();
            config.root = std::env::current_dir()?;
            config.validate()?;
            return Ok(config);
        }

        Self::load(path)
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            project: ProjectConfig::default(),
            pages: PagesConfig::default(),
            output: OutputConfig::default(),
            policy: PolicyConfig::default(),
            rules: default_rules(),
            dev: DevConfig::default(),
            root: PathBuf::from("."),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let pages_dir = self.pages_dir();
        if !pages_dir.is_dir() {
            anyhow::bail!("Pages root does not exist: {}", pages_dir.display());
        }

        for (kind, names) in [("entry", &self.pages.entry), ("template", &self.pages.template)] {
            if names.is_empty() {
                anyhow::bail!("At least one {} filename must be specified in [pages]", kind);
            }
            if let Some(bad) = names.iter().find(|n| n.is_empty() || n.contains(['/', '\\'])) {
                anyhow::bail!("Invalid {} filename '{}': must be a bare file name", kind, bad);
            }
        }

        build_globset(&self.pages.exclude).context("Invalid [pages] exclude pattern")?;

        if self.output.separator.contains(['/', '\\']) {
            anyhow::bail!(
                "Output separator '{}' must not contain a path separator",
                self.output.separator
            );
        }

        // Rule tests are JavaScript regexes evaluated by the bundler
        for rule in &self.rules {
            if let Err(err) = regex::Regex::new(&rule.test) {
                warn!("Rule test '{}' is not a portable regex: {}", rule.test, err);
            }
        }

        Ok(())
    }

    /// Get the absolute pages directory path
    pub fn pages_dir(&self) -> PathBuf {
        self.root.join(&self.pages.root)
    }

    /// Get the absolute output directory path
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.output.dir)
    }

    /// Discovery layout for the resolvers
    pub fn layout(&self) -> PagesLayout {
        PagesLayout {
            project_root: self.root.clone(),
            pages_root: self.pages.root.clone(),
            entry: self.pages.entry.clone(),
            template: self.pages.template.clone(),
            exclude: self.pages.exclude.clone(),
        }
    }

    /// Output naming rule for template bindings
    pub fn naming(&self) -> NamingRule {
        NamingRule {
            naming: self.output.naming,
            separator: self.output.separator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn project(config: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/pages")).unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG), config).unwrap();
        dir
    }

    #[test]
    fn test_load_minimal_config() {
        let dir = project("[project]\nname = \"site\"\n");
        let config = Config::load(dir.path().join(DEFAULT_CONFIG)).unwrap();

        assert_eq!(config.project.name, "site");
        assert_eq!(config.pages.root, "src/pages");
        assert_eq!(config.pages.entry, vec!["index.js".to_string()]);
        assert_eq!(config.output.naming, OutputNaming::Sanitize);
        assert_eq!(config.policy.duplicates, DuplicatePolicy::Error);
        assert_eq!(config.rules, default_rules());
        assert_eq!(config.dev.port, 8080);
        assert_eq!(config.root, dir.path());
    }

    #[test]
    fn test_load_full_config() {
        let dir = project(
            r#"
[pages]
root = "src/pages"
entry = ["index.ts", "index.js"]
template = ["index.html"]

[output]
dir = "build"
naming = "literal"

[policy]
duplicates = "overwrite"
orphans = "ignore"

[[rules]]
test = '\.less$'
use = ["style-loader", "css-loader", "less-loader"]

[dev]
port = 3000
open = true
"#,
        );
        let config = Config::load(dir.path().join(DEFAULT_CONFIG)).unwrap();

        assert_eq!(config.pages.entry.len(), 2);
        assert_eq!(config.output_dir(), dir.path().join("build"));
        assert_eq!(config.output.naming, OutputNaming::Literal);
        assert_eq!(config.policy.orphans, OrphanPolicy::Ignore);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].loaders.len(), 3);
        assert_eq!(config.dev.port, 3000);
        assert!(config.dev.open);
        assert!(config.dev.hot);
    }

    #[test]
    fn test_missing_pages_root_rejected() {
        let dir = project("[pages]\nroot = \"app/pages\"\n");
        let err = Config::load(dir.path().join(DEFAULT_CONFIG)).unwrap_err();
        assert!(err.to_string().contains("Pages root does not exist"));
    }

    #[test]
    fn test_filename_with_separator_rejected() {
        let dir = project("[pages]\nentry = [\"js/index.js\"]\n");
        assert!(Config::load(dir.path().join(DEFAULT_CONFIG)).is_err());
    }

    #[test]
    fn test_bad_separator_rejected() {
        let dir = project("[output]\nseparator = \"/\"\n");
        assert!(Config::load(dir.path().join(DEFAULT_CONFIG)).is_err());
    }

    #[test]
    fn test_javascript_only_rule_accepted() {
        let dir = project("[[rules]]\ntest = '(?<!\\.min)\\.js$'\nuse = [\"babel-loader\"]\n");
        let config = Config::load(dir.path().join(DEFAULT_CONFIG)).unwrap();
        assert_eq!(config.rules[0].test, r"(?<!\.min)\.js$");
    }

    #[test]
    fn test_layout_from_config() {
        let dir = project("");
        let config = Config::load(dir.path().join(DEFAULT_CONFIG)).unwrap();
        let layout = config.layout();

        assert_eq!(layout.pages_dir(), dir.path().join("src/pages"));
        assert_eq!(layout.template, vec!["index.html".to_string()]);
        assert_eq!(config.naming().separator, "-");
    }
}
