//! Template binding
//!
//! Pairs every page template with its output filename and the one chunk it
//! is allowed to load. Page ids come from the same [`PagePattern`] rule the
//! entry resolver uses, so a binding's chunk always names its own script.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::config::{DuplicatePolicy, OutputNaming};
use crate::error::DiscoveryError;
use crate::page::{PageId, PagePattern};
use crate::resolver::{scan_files, PagesLayout, Resolution};
use crate::utils::to_request;

/// One template → output page directive for the bundler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateBinding {
    /// Page this binding renders
    #[serde(skip)]
    pub page_id: PageId,

    /// Template source request
    pub template: String,

    /// Rendered output filename
    pub filename: String,

    /// Chunks injected into the page, always `[page_id]`
    pub chunks: Vec<PageId>,
}

impl TemplateBinding {
    pub fn new(page_id: PageId, template: String, filename: String) -> Self {
        Self {
            chunks: vec![page_id.clone()],
            page_id,
            template,
            filename,
        }
    }
}

/// How nested page ids become output filenames
#[derive(Debug, Clone)]
pub struct NamingRule {
    pub naming: OutputNaming,
    pub separator: String,
}

impl NamingRule {
    /// Output filename for a page, `<id>.html` with the id flattened per rule
    pub fn output_filename(&self, id: &PageId) -> String {
        match self.naming {
            OutputNaming::Literal => format!("{}.html", id),
            OutputNaming::Sanitize => format!("{}.html", id.flatten(&self.separator)),
        }
    }
}

impl Default for NamingRule {
    fn default() -> Self {
        Self {
            naming: OutputNaming::Sanitize,
            separator: "-".to_string(),
        }
    }
}

/// Binds page templates to output files
pub struct TemplateBinder<'a> {
    layout: &'a PagesLayout,
    pattern: PagePattern,
    naming: NamingRule,
    duplicates: DuplicatePolicy,
}

impl<'a> TemplateBinder<'a> {
    /// Create a new binder
    pub fn new(
        layout: &'a PagesLayout,
        naming: NamingRule,
        duplicates: DuplicatePolicy,
    ) -> Result<Self, DiscoveryError> {
        Ok(Self {
            layout,
            pattern: layout.pattern(&layout.template)?,
            naming,
            duplicates,
        })
    }

    /// Scan for templates and build one binding per page, ordered by page id
    pub fn resolve(&self) -> Result<Resolution<Vec<TemplateBinding>>, DiscoveryError> {
        let mut bindings: BTreeMap<PageId, TemplateBinding> = BTreeMap::new();
        let mut diagnostics = Vec::new();

        for path in scan_files(self.layout, &self.layout.template)? {
            let id = self.pattern.derive(&path)?;
            let filename = self.naming.output_filename(&id);
            let binding = TemplateBinding::new(id.clone(), to_request(&path), filename);

            debug!("Template {} -> {}", binding.template, binding.filename);

            if let Some(previous) = bindings.insert(id.clone(), binding) {
                self.duplicates.handle(
                    DiscoveryError::DuplicatePageId {
                        id,
                        first: previous.template,
                        second: to_request(&path),
                    },
                    &mut diagnostics,
                )?;
            }
        }

        let bindings: Vec<TemplateBinding> = bindings.into_values().collect();
        check_output_collisions(&bindings)?;

        Ok(Resolution {
            value: bindings,
            diagnostics,
        })
    }
}

/// Fail when two bindings would write the same output file
fn check_output_collisions(bindings: &[TemplateBinding]) -> Result<(), DiscoveryError> {
    let mut seen: HashMap<&str, &PageId> = HashMap::new();

    for binding in bindings {
        if let Some(first) = seen.insert(&binding.filename, &binding.page_id) {
            return Err(DiscoveryError::OutputCollision {
                filename: binding.filename.clone(),
                first: first.clone(),
                second: binding.page_id.clone(),
            });
        }
    }

    Ok(())
}

/// Resolve every template under the pages root
pub fn resolve_templates(
    layout: &PagesLayout,
    naming: NamingRule,
    duplicates: DuplicatePolicy,
) -> Result<Resolution<Vec<TemplateBinding>>, DiscoveryError> {
    TemplateBinder::new(layout, naming, duplicates)?.resolve()
}
