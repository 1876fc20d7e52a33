//! Page discovery and entry resolution
//!
//! Walks the pages root for files with a canonical name and maps each one to
//! its page id. The scan is shared by the entry resolver here and the
//! template binder in [`crate::binder`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::DuplicatePolicy;
use crate::error::DiscoveryError;
use crate::page::{PageId, PagePattern};
use crate::utils::{clean_path, path_to_module_id, relative_path, to_request};

/// Page id → entry script request, ordered by id
pub type EntryMap = BTreeMap<PageId, String>;

/// Where pages live and what their canonical files are called
#[derive(Debug, Clone)]
pub struct PagesLayout {
    /// Project root, the directory holding pagemap.toml
    pub project_root: PathBuf,

    /// Pages root relative to the project root
    pub pages_root: String,

    /// Canonical entry script filenames
    pub entry: Vec<String>,

    /// Canonical template filenames
    pub template: Vec<String>,

    /// Globs (relative to the pages root) removed from every scan
    pub exclude: Vec<String>,
}

impl PagesLayout {
    /// Absolute pages directory
    pub fn pages_dir(&self) -> PathBuf {
        self.project_root.join(&self.pages_root)
    }

    /// Compile the id extraction rule for a set of canonical filenames
    pub fn pattern(&self, filenames: &[String]) -> Result<PagePattern, DiscoveryError> {
        PagePattern::new(&self.pages_root, filenames)
    }
}

/// Outcome of one resolver run
#[derive(Debug)]
pub struct Resolution<T> {
    pub value: T,

    /// Non-fatal conditions reported under a `warn` policy
    pub diagnostics: Vec<DiscoveryError>,
}

/// Build a glob set from patterns
pub fn build_globset<I, S>(patterns: I) -> Result<GlobSet, DiscoveryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = Glob::new(pattern).map_err(|source| DiscoveryError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| DiscoveryError::InvalidGlob {
        pattern: "<set>".to_string(),
        source,
    })
}

/// Exclude globs, matched against paths relative to the pages root
pub struct ExcludeSet {
    files: GlobSet,
    dirs: GlobSet,
}

impl ExcludeSet {
    /// Compile the patterns; directories are matched with any trailing `/**` removed
    pub fn new(patterns: &[String]) -> Result<Self, DiscoveryError> {
        Ok(Self {
            files: build_globset(patterns)?,
            dirs: build_globset(patterns.iter().map(|p| p.trim_end_matches("/**")))?,
        })
    }

    /// Whether the walk should not descend into this directory
    pub fn skips_dir(&self, within: &str) -> bool {
        self.dirs.is_match(within)
    }

    pub fn skips_file(&self, within: &str) -> bool {
        self.files.is_match(within)
    }
}

/// Scan the pages root for files matching `**/<filename>`
///
/// Returned paths are `<pages_root>/<path within pages root>` with forward
/// slashes, sorted by directory walk order (file name at every level).
pub fn scan_files(layout: &PagesLayout, filenames: &[String]) -> Result<Vec<String>, DiscoveryError> {
    let pages_dir = layout.pages_dir();
    if !pages_dir.is_dir() {
        return Err(DiscoveryError::RootMissing(pages_dir));
    }

    let include = build_globset(filenames.iter().map(|name| format!("**/{}", name)))?;
    let exclude = ExcludeSet::new(&layout.exclude)?;
    let root = clean_path(&path_to_module_id(&layout.pages_root));

    let mut files = Vec::new();

    let walker = WalkDir::new(&pages_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            match relative_path(&pages_dir, entry.path()) {
                Some(within) if exclude.skips_dir(&within) => {
                    debug!("Skipping excluded directory {}", within);
                    false
                }
                _ => true,
            }
        });

    for entry in walker {
        let entry = entry.map_err(|source| DiscoveryError::Walk {
            path: pages_dir.clone(),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(within) = relative_path(&pages_dir, entry.path()) else {
            continue;
        };

        if !include.is_match(&within) || exclude.skips_file(&within) {
            continue;
        }

        let path = if root.is_empty() {
            within
        } else {
            format!("{}/{}", root, within)
        };

        debug!("Discovered {}", path);
        files.push(path);
    }

    Ok(files)
}

/// Resolves entry scripts to an [`EntryMap`]
pub struct EntryResolver<'a> {
    layout: &'a PagesLayout,
    pattern: PagePattern,
    duplicates: DuplicatePolicy,
}

impl<'a> EntryResolver<'a> {
    /// Create a new resolver
    pub fn new(layout: &'a PagesLayout, duplicates: DuplicatePolicy) -> Result<Self, DiscoveryError> {
        Ok(Self {
            layout,
            pattern: layout.pattern(&layout.entry)?,
            duplicates,
        })
    }

    /// Scan for entry scripts and map each to its page id
    pub fn resolve(&self) -> Result<Resolution<EntryMap>, DiscoveryError> {
        let mut entries = EntryMap::new();
        let mut diagnostics = Vec::new();

        for path in scan_files(self.layout, &self.layout.entry)? {
            let id = self.pattern.derive(&path)?;
            let request = to_request(&path);

            debug!("Entry {} -> {}", id, request);

            if let Some(previous) = entries.insert(id.clone(), request.clone()) {
                self.duplicates.handle(
                    DiscoveryError::DuplicatePageId {
                        id,
                        first: previous,
                        second: request,
                    },
                    &mut diagnostics,
                )?;
            }
        }

        Ok(Resolution {
            value: entries,
            diagnostics,
        })
    }
}

/// Resolve every entry script under the pages root
pub fn resolve_entries(
    layout: &PagesLayout,
    duplicates: DuplicatePolicy,
) -> Result<Resolution<EntryMap>, DiscoveryError> {
    EntryResolver::new(layout, duplicates)?.resolve()
}
