//! High-level operations.
//!
//! This module contains the implementation of extbuild commands.

pub mod extbuild_build;
pub mod extbuild_deps;
pub mod probe;

pub use extbuild_build::{build, BuildOptions, BuiltExtension};
pub use extbuild_deps::{resolve_deps, search_path, DepsOptions};
pub use probe::{format_report, probe, ProbeReport};
