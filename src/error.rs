//! Discovery errors
//!
//! Every variant here aborts configuration assembly. No partial
//! [`BuildSpec`](crate::assembler::BuildSpec) is produced once one is raised.

use std::path::PathBuf;

use thiserror::Error;

use crate::page::PageId;

/// Errors raised while scanning the pages tree or assembling the build spec
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The pages root does not exist or is not a directory
    #[error("pages root does not exist: {}", .0.display())]
    RootMissing(PathBuf),

    /// Directory traversal failed
    #[error("failed to scan {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// An exclude or filename glob could not be compiled
    #[error("invalid glob '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// The page id extraction pattern could not be compiled
    #[error("invalid page pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The scan returned a path the id extraction rule cannot parse
    #[error("malformed page path '{path}': does not match {pattern}")]
    MalformedPath { path: String, pattern: String },

    /// Two files of the same kind resolved to one page id
    #[error("duplicate page id '{id}': '{first}' and '{second}'")]
    DuplicatePageId {
        id: PageId,
        first: String,
        second: String,
    },

    /// Two bindings flatten to the same output filename
    #[error("output filename '{filename}' produced by both '{first}' and '{second}'")]
    OutputCollision {
        filename: String,
        first: PageId,
        second: PageId,
    },

    /// A template has no entry, or an entry has no template
    #[error("page '{id}' has {present} but no {missing}")]
    OrphanBinding {
        id: PageId,
        present: &'static str,
        missing: &'static str,
    },
}

impl DiscoveryError {
    pub(crate) fn orphan_template(id: PageId) -> Self {
        Self::OrphanBinding {
            id,
            present: "a template",
            missing: "entry script",
        }
    }

    pub(crate) fn orphan_entry(id: PageId) -> Self {
        Self::OrphanBinding {
            id,
            present: "an entry script",
            missing: "template",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orphan_messages() {
        let err = DiscoveryError::orphan_template(PageId::from("about"));
        assert_eq!(err.to_string(), "page 'about' has a template but no entry script");

        let err = DiscoveryError::orphan_entry(PageId::from("admin/users"));
        assert_eq!(err.to_string(), "page 'admin/users' has an entry script but no template");
    }
}
