//! Build spec assembly
//!
//! Runs the entry resolver and the template binder over the same layout,
//! checks the two results against each other and merges them with the
//! global bundler options into one [`BuildSpec`].

mod spec;

use tracing::{debug, info};

use crate::binder::{resolve_templates, NamingRule, TemplateBinding};
use crate::config::{Config, DuplicatePolicy, OrphanPolicy};
use crate::error::DiscoveryError;
use crate::resolver::{resolve_entries, EntryMap, PagesLayout};

pub use spec::{BuildSpec, BundlerOptions, DevServerSpec, Mode, ModuleSpec, OutputSpec, PageSummary};

/// An assembled spec plus the non-fatal conditions found on the way
#[derive(Debug)]
pub struct Assembly {
    pub spec: BuildSpec,
    pub diagnostics: Vec<DiscoveryError>,
}

/// Composes discovery results into a [`BuildSpec`]
pub struct Assembler<'a> {
    layout: &'a PagesLayout,
    naming: NamingRule,
    duplicates: DuplicatePolicy,
    orphans: OrphanPolicy,
}

impl<'a> Assembler<'a> {
    pub fn new(layout: &'a PagesLayout) -> Self {
        Self {
            layout,
            naming: NamingRule::default(),
            duplicates: DuplicatePolicy::default(),
            orphans: OrphanPolicy::default(),
        }
    }

    pub fn naming(mut self, naming: NamingRule) -> Self {
        self.naming = naming;
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// Discover pages and assemble the build spec; any error aborts with no output
    pub fn assemble(&self, options: BundlerOptions) -> Result<Assembly, DiscoveryError> {
        info!("Discovering pages in {}", self.layout.pages_dir().display());

        let entries = resolve_entries(self.layout, self.duplicates)?;
        let templates = resolve_templates(self.layout, self.naming.clone(), self.duplicates)?;

        let mut diagnostics = entries.diagnostics;
        diagnostics.extend(templates.diagnostics);

        check_orphans(&entries.value, &templates.value, self.orphans, &mut diagnostics)?;

        debug!(
            "Resolved {} entries and {} templates",
            entries.value.len(),
            templates.value.len()
        );

        let spec = BuildSpec {
            mode: options.mode,
            entry: entries.value,
            output: options.output,
            module: ModuleSpec { rules: options.rules },
            html: templates.value,
            dev_server: options.dev_server,
        };

        Ok(Assembly { spec, diagnostics })
    }
}

/// Report templates without an entry and entries without a template
fn check_orphans(
    entries: &EntryMap,
    bindings: &[TemplateBinding],
    policy: OrphanPolicy,
    diagnostics: &mut Vec<DiscoveryError>,
) -> Result<(), DiscoveryError> {
    if policy == OrphanPolicy::Ignore {
        return Ok(());
    }

    for binding in bindings {
        for chunk in &binding.chunks {
            if !entries.contains_key(chunk) {
                policy.handle(DiscoveryError::orphan_template(chunk.clone()), diagnostics)?;
            }
        }
    }

    for id in entries.keys() {
        if !bindings.iter().any(|b| &b.page_id == id) {
            policy.handle(DiscoveryError::orphan_entry(id.clone()), diagnostics)?;
        }
    }

    Ok(())
}

/// Assemble the build spec for a layout with the given options and policies
pub fn build_spec(
    layout: &PagesLayout,
    options: BundlerOptions,
    naming: NamingRule,
    duplicates: DuplicatePolicy,
    orphans: OrphanPolicy,
) -> Result<Assembly, DiscoveryError> {
    Assembler::new(layout)
        .naming(naming)
        .duplicates(duplicates)
        .orphans(orphans)
        .assemble(options)
}

/// Assemble the build spec described by a project config
pub fn build_spec_from_config(config: &Config, mode: Mode) -> Result<Assembly, DiscoveryError> {
    build_spec(
        &config.layout(),
        BundlerOptions::from_config(config, mode),
        config.naming(),
        config.policy.duplicates,
        config.policy.orphans,
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::config::{default_rules, OutputNaming};
    use crate::page::PageId;
    use crate::resolver::tests::{layout, touch};

    fn options(mode: Mode) -> BundlerOptions {
        BundlerOptions {
            mode,
            output: OutputSpec {
                path: "/project/dist".to_string(),
                filename: "js/[name].[contenthash:8].js".to_string(),
                public_path: "/".to_string(),
            },
            rules: default_rules(),
            dev_server: match mode {
                Mode::Development => Some(DevServerSpec {
                    static_root: "dist".to_string(),
                    compress: true,
                    port: 8080,
                    hot: true,
                    open: false,
                }),
                Mode::Production => None,
            },
        }
    }

    fn site(root: &Path, files: &[&str]) {
        for rel in files {
            touch(root, rel);
        }
    }

    #[test]
    fn test_two_page_site() {
        let dir = TempDir::new().unwrap();
        site(
            dir.path(),
            &[
                "src/pages/index/index.js",
                "src/pages/index/index.html",
                "src/pages/index/index.css",
                "src/pages/about/index.js",
                "src/pages/about/index.html",
            ],
        );

        let assembly = Assembler::new(&layout(dir.path()))
            .assemble(options(Mode::Production))
            .unwrap();
        let spec = assembly.spec;

        let ids: Vec<&str> = spec.entry.keys().map(PageId::as_str).collect();
        assert_eq!(ids, vec!["about", "index"]);
        assert_eq!(spec.entry[&PageId::from("index")], "./src/pages/index/index.js");

        let outputs: Vec<&str> = spec.html.iter().map(|b| b.filename.as_str()).collect();
        assert_eq!(outputs, vec!["about.html", "index.html"]);
        for binding in &spec.html {
            assert_eq!(binding.chunks, vec![binding.page_id.clone()]);
            assert!(spec.entry.contains_key(&binding.chunks[0]));
        }
        assert!(assembly.diagnostics.is_empty());
        assert!(spec.dev_server.is_none());
    }

    #[test]
    fn test_script_without_template_warns() {
        let dir = TempDir::new().unwrap();
        site(
            dir.path(),
            &["src/pages/home/index.js", "src/pages/home/index.html", "src/pages/worker/index.js"],
        );

        let assembly = Assembler::new(&layout(dir.path()))
            .assemble(options(Mode::Production))
            .unwrap();

        assert!(assembly.spec.entry.contains_key(&PageId::from("worker")));
        assert!(assembly.spec.html.iter().all(|b| b.page_id.as_str() != "worker"));
        assert_eq!(assembly.diagnostics.len(), 1);
        assert!(matches!(
            &assembly.diagnostics[0],
            DiscoveryError::OrphanBinding { id, .. } if id.as_str() == "worker"
        ));
    }

    #[test]
    fn test_script_without_template_ignored() {
        let dir = TempDir::new().unwrap();
        site(dir.path(), &["src/pages/worker/index.js"]);

        let assembly = Assembler::new(&layout(dir.path()))
            .orphans(OrphanPolicy::Ignore)
            .assemble(options(Mode::Production))
            .unwrap();

        assert_eq!(assembly.spec.entry.len(), 1);
        assert!(assembly.spec.html.is_empty());
        assert!(assembly.diagnostics.is_empty());
    }

    #[test]
    fn test_template_without_script_fails_when_strict() {
        let dir = TempDir::new().unwrap();
        site(dir.path(), &["src/pages/static/index.html"]);

        let err = Assembler::new(&layout(dir.path()))
            .orphans(OrphanPolicy::Error)
            .assemble(options(Mode::Production))
            .unwrap_err();

        assert_eq!(err.to_string(), "page 'static' has a template but no entry script");
    }

    #[test]
    fn test_malformed_path_aborts_assembly() {
        let dir = TempDir::new().unwrap();
        site(
            dir.path(),
            &["src/pages/about/index.js", "src/pages/about/index.html", "src/pages/index.html"],
        );

        let result = Assembler::new(&layout(dir.path())).assemble(options(Mode::Production));
        assert!(matches!(result, Err(DiscoveryError::MalformedPath { .. })));
    }

    #[test]
    fn test_repeated_assembly_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        site(
            dir.path(),
            &[
                "src/pages/b/index.js",
                "src/pages/b/index.html",
                "src/pages/a/x/index.js",
                "src/pages/a/x/index.html",
                "src/pages/a-x2/index.js",
            ],
        );
        let layout = layout(dir.path());

        let first = Assembler::new(&layout).assemble(options(Mode::Production)).unwrap().spec;
        let second = Assembler::new(&layout).assemble(options(Mode::Production)).unwrap().spec;

        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
        assert_eq!(first.fingerprint().unwrap(), second.fingerprint().unwrap());
    }

    #[test]
    fn test_json_shape() {
        let dir = TempDir::new().unwrap();
        site(dir.path(), &["src/pages/admin/users/index.js", "src/pages/admin/users/index.html"]);

        let spec = Assembler::new(&layout(dir.path()))
            .naming(NamingRule {
                naming: OutputNaming::Literal,
                separator: "-".to_string(),
            })
            .assemble(options(Mode::Development))
            .unwrap()
            .spec;

        let value: serde_json::Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "mode": "development",
                "entry": { "admin/users": "./src/pages/admin/users/index.js" },
                "output": {
                    "path": "/project/dist",
                    "filename": "js/[name].[contenthash:8].js",
                    "publicPath": "/"
                },
                "module": {
                    "rules": [{ "test": "\\.css$", "use": ["style-loader", "css-loader"] }]
                },
                "html": [{
                    "template": "./src/pages/admin/users/index.html",
                    "filename": "admin/users.html",
                    "chunks": ["admin/users"]
                }],
                "devServer": {
                    "static": "dist",
                    "compress": true,
                    "port": 8080,
                    "hot": true,
                    "open": false
                }
            })
        );
    }

    #[test]
    fn test_page_summaries() {
        let dir = TempDir::new().unwrap();
        site(
            dir.path(),
            &["src/pages/home/index.js", "src/pages/home/index.html", "src/pages/lonely/index.html"],
        );

        let spec = Assembler::new(&layout(dir.path()))
            .assemble(options(Mode::Production))
            .unwrap()
            .spec;
        let pages = spec.pages();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].id.as_str(), "home");
        assert!(pages[0].entry.is_some() && pages[0].template.is_some());
        assert_eq!(pages[1].id.as_str(), "lonely");
        assert_eq!(pages[1].entry, None);
        assert_eq!(pages[1].output.as_deref(), Some("lonely.html"));
    }
}
