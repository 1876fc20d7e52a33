//! The build specification handed to the external bundler

use std::collections::BTreeMap;

use serde::Serialize;

use crate::binder::TemplateBinding;
use crate::config::{Config, DevConfig, RuleConfig};
use crate::page::PageId;
use crate::resolver::EntryMap;
use crate::utils::{hash_content, path_to_module_id};

/// Bundler mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Production,
    Development,
}

/// Output location and naming strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    /// Absolute output directory
    pub path: String,

    /// Script filename template
    pub filename: String,

    pub public_path: String,
}

/// Static per-file-type rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSpec {
    pub rules: Vec<RuleConfig>,
}

/// Dev-server settings, passed through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevServerSpec {
    #[serde(rename = "static")]
    pub static_root: String,
    pub compress: bool,
    pub port: u16,
    pub hot: bool,
    pub open: bool,
}

impl DevServerSpec {
    pub fn from_config(dev: &DevConfig) -> Self {
        Self {
            static_root: dev.static_root.clone(),
            compress: dev.compress,
            port: dev.port,
            hot: dev.hot,
            open: dev.open,
        }
    }
}

/// Global bundler options merged with the discovered pages
#[derive(Debug, Clone)]
pub struct BundlerOptions {
    pub mode: Mode,
    pub output: OutputSpec,
    pub rules: Vec<RuleConfig>,
    pub dev_server: Option<DevServerSpec>,
}

impl BundlerOptions {
    /// Derive options from the project config; dev-server settings are only
    /// carried in development mode
    pub fn from_config(config: &Config, mode: Mode) -> Self {
        Self {
            mode,
            output: OutputSpec {
                path: path_to_module_id(config.output_dir()),
                filename: config.output.filename.clone(),
                public_path: config.output.public_path.clone(),
            },
            rules: config.rules.clone(),
            dev_server: match mode {
                Mode::Development => Some(DevServerSpec::from_config(&config.dev)),
                Mode::Production => None,
            },
        }
    }
}

/// Complete configuration for one bundler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    pub mode: Mode,
    pub entry: EntryMap,
    pub output: OutputSpec,
    pub module: ModuleSpec,
    pub html: Vec<TemplateBinding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerSpec>,
}

/// Per-page view of a build spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub id: PageId,
    pub entry: Option<String>,
    pub template: Option<String>,
    pub output: Option<String>,
}

impl BuildSpec {
    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Content fingerprint of the serialized spec
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        Ok(hash_content(self.to_json()?.as_bytes()))
    }

    /// Every page seen by either resolver, ordered by id
    pub fn pages(&self) -> Vec<PageSummary> {
        let mut pages: BTreeMap<&PageId, PageSummary> = BTreeMap::new();

        for (id, entry) in &self.entry {
            pages.entry(id).or_insert_with(|| empty_summary(id)).entry = Some(entry.clone());
        }

        for binding in &self.html {
            let page = pages
                .entry(&binding.page_id)
                .or_insert_with(|| empty_summary(&binding.page_id));
            page.template = Some(binding.template.clone());
            page.output = Some(binding.filename.clone());
        }

        pages.into_values().collect()
    }
}

fn empty_summary(id: &PageId) -> PageSummary {
    PageSummary {
        id: id.clone(),
        entry: None,
        template: None,
        output: None,
    }
}
