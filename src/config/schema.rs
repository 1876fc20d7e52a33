//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DiscoveryError;

/// Project metadata configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
        }
    }
}

fn default_name() -> String {
    "my-app".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Pages tree layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Pages root, relative to the config file
    #[serde(default = "default_pages_root")]
    pub root: String,

    /// Canonical entry script filenames
    #[serde(default = "default_entry")]
    pub entry: Vec<String>,

    /// Canonical template filenames
    #[serde(default = "default_template")]
    pub template: Vec<String>,

    /// Globs excluded from discovery, relative to the pages root
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            root: default_pages_root(),
            entry: default_entry(),
            template: default_template(),
            exclude: default_exclude(),
        }
    }
}

fn default_pages_root() -> String {
    "src/pages".to_string()
}

fn default_entry() -> Vec<String> {
    vec!["index.js".to_string()]
}

fn default_template() -> Vec<String> {
    vec!["index.html".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

/// How nested page ids are flattened into output filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputNaming {
    /// Keep separators: `admin/users.html`
    Literal,
    /// Replace separators: `admin-users.html`
    #[default]
    Sanitize,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// Script filename template, `[name]` is the page id
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Public URL prefix for assets
    #[serde(default = "default_public_path")]
    pub public_path: String,

    /// Page output naming for nested ids
    #[serde(default)]
    pub naming: OutputNaming,

    /// Replacement for `/` when naming is `sanitize`
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            filename: default_filename(),
            public_path: default_public_path(),
            naming: OutputNaming::default(),
            separator: default_separator(),
        }
    }
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_filename() -> String {
    "js/[name].[contenthash:8].js".to_string()
}

fn default_public_path() -> String {
    "/".to_string()
}

fn default_separator() -> String {
    "-".to_string()
}

/// Handling of two files resolving to one page id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Later file silently replaces the earlier one
    Overwrite,
    /// Later file replaces the earlier one and a warning is reported
    Warn,
    /// Abort discovery
    #[default]
    Error,
}

impl DuplicatePolicy {
    /// Apply the policy to a detected duplicate
    pub fn handle(self, err: DiscoveryError, diagnostics: &mut Vec<DiscoveryError>) -> Result<(), DiscoveryError> {
        match self {
            DuplicatePolicy::Overwrite => Ok(()),
            DuplicatePolicy::Warn => {
                warn!("{}", err);
                diagnostics.push(err);
                Ok(())
            }
            DuplicatePolicy::Error => Err(err),
        }
    }
}

/// Handling of pages with a template but no entry, or the reverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    Ignore,
    #[default]
    Warn,
    Error,
}

impl OrphanPolicy {
    /// Apply the policy to a detected orphan
    pub fn handle(self, err: DiscoveryError, diagnostics: &mut Vec<DiscoveryError>) -> Result<(), DiscoveryError> {
        match self {
            OrphanPolicy::Ignore => Ok(()),
            OrphanPolicy::Warn => {
                warn!("{}", err);
                diagnostics.push(err);
                Ok(())
            }
            OrphanPolicy::Error => Err(err),
        }
    }
}

/// Consistency policies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    #[serde(default)]
    pub orphans: OrphanPolicy,
}

/// Per-file-type processing rule handed to the bundler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Regular expression matched against module paths
    pub test: String,

    /// Loaders applied, last to first
    #[serde(rename = "use")]
    pub loaders: Vec<String>,
}

pub(crate) fn default_rules() -> Vec<RuleConfig> {
    vec![RuleConfig {
        test: r"\.css$".to_string(),
        loaders: vec!["style-loader".to_string(), "css-loader".to_string()],
    }]
}

/// Development server configuration, passed through to the bundler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    /// Directory served as static content
    #[serde(default = "default_output_dir")]
    pub static_root: String,

    /// Enable gzip compression
    #[serde(default = "default_true")]
    pub compress: bool,

    /// Port to run dev server on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable hot module replacement
    #[serde(default = "default_true")]
    pub hot: bool,

    /// Open browser automatically
    #[serde(default)]
    pub open: bool,
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            static_root: default_output_dir(),
            compress: true,
            port: default_port(),
            hot: true,
            open: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies_parse_lowercase() {
        let policy: PolicyConfig = toml::from_str("duplicates = \"warn\"\norphans = \"error\"").unwrap();
        assert_eq!(policy.duplicates, DuplicatePolicy::Warn);
        assert_eq!(policy.orphans, OrphanPolicy::Error);
    }

    #[test]
    fn test_policy_defaults() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.duplicates, DuplicatePolicy::Error);
        assert_eq!(policy.orphans, OrphanPolicy::Warn);
    }

    #[test]
    fn test_orphan_policy_handle() {
        let mut diagnostics = Vec::new();
        let orphan = || DiscoveryError::orphan_entry("about".into());

        assert!(OrphanPolicy::Ignore.handle(orphan(), &mut diagnostics).is_ok());
        assert!(diagnostics.is_empty());

        assert!(OrphanPolicy::Warn.handle(orphan(), &mut diagnostics).is_ok());
        assert_eq!(diagnostics.len(), 1);

        assert!(OrphanPolicy::Error.handle(orphan(), &mut diagnostics).is_err());
    }

    #[test]
    fn test_rule_uses_use_key() {
        let rule: RuleConfig = toml::from_str("test = '\\.scss$'\nuse = [\"sass-loader\"]").unwrap();
        assert_eq!(rule.test, r"\.scss$");
        assert_eq!(rule.loaders, vec!["sass-loader".to_string()]);
    }
}
