//! Binary dependency resolution.
//!
//! Windows has no transitive shared-library bundling, so every DLL the
//! extension loads at runtime is located on disk and shipped with the
//! package. Lookup is pure; aliasing is a separate, explicit step.

pub mod manifest;
pub mod search;

pub use manifest::{assemble, DataFileEntry, DependencyManifest};
pub use search::{ensure_alias, locate, AliasOutcome, SearchPath};
