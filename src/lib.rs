//! Pagemap library
//!
//! Discovers pages in a multi-page front-end project and derives the
//! entry map and template bindings a bundler needs to build them.

pub mod assembler;
pub mod binder;
pub mod cli;
pub mod config;
pub mod error;
pub mod page;
pub mod resolver;
pub mod utils;

pub use assembler::{build_spec, Assembler, BuildSpec};
pub use binder::{resolve_templates, TemplateBinding};
pub use cli::Cli;
pub use config::Config;
pub use error::DiscoveryError;
pub use page::PageId;
pub use resolver::{resolve_entries, EntryMap};
