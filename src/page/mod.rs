//! Page identifiers
//!
//! A page id is derived from a file path by stripping the pages root prefix
//! and the canonical filename suffix. Entry scripts and templates share the
//! one rule in [`PagePattern`], so a script and a template in the same page
//! directory always resolve to the same id.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DiscoveryError;
use crate::utils::{clean_path, path_to_module_id};

/// Identifier of one page, e.g. `about` or `admin/users`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id spans nested page groups
    pub fn is_nested(&self) -> bool {
        self.0.contains('/')
    }

    /// Replace every group separator with `separator`
    pub fn flatten(&self, separator: &str) -> String {
        self.0.replace('/', separator)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The id extraction rule `<pages_root>/(.+)/<filename>`
#[derive(Debug, Clone)]
pub struct PagePattern {
    regex: Regex,
}

impl PagePattern {
    /// Compile the rule for a pages root and its canonical filenames
    ///
    /// `pages_root` is relative to the project root; `./src/pages/` and
    /// `src/pages` compile to the same pattern.
    pub fn new<S: AsRef<str>>(pages_root: &str, filenames: &[S]) -> Result<Self, DiscoveryError> {
        let root = clean_path(&path_to_module_id(pages_root));
        let prefix = if root.is_empty() {
            String::new()
        } else {
            format!("{}/", regex::escape(root.trim_end_matches('/')))
        };

        let names = filenames
            .iter()
            .map(|name| regex::escape(name.as_ref()))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!("^{}(.+)/(?:{})$", prefix, names);
        let regex = Regex::new(&pattern)
            .map_err(|source| DiscoveryError::InvalidPattern { pattern, source })?;

        Ok(Self { regex })
    }

    /// Derive the page id for a project-relative path
    pub fn derive(&self, path: &str) -> Result<PageId, DiscoveryError> {
        let normalized = clean_path(&path_to_module_id(path));

        self.regex
            .captures(&normalized)
            .and_then(|cap| cap.get(1))
            .map(|id| PageId(id.as_str().to_string()))
            .ok_or_else(|| DiscoveryError::MalformedPath {
                path: normalized.clone(),
                pattern: self.regex.as_str().to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
