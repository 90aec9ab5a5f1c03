//! extbuild - CMake-driven builds for native extension modules
//!
//! This crate provides the core library functionality for extbuild:
//! driving CMake for each extension target with platform-specific
//! arguments, and resolving the shared libraries that must ship with the
//! extension on Windows.

pub mod builder;
pub mod core;
pub mod deps;
pub mod ops;
pub mod util;

/// Test utilities and mocks for extbuild unit tests.
///
/// Only compiled for tests. Provides a recording mock for process execution.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    errors::BuildError, manifest::Manifest, platform::Platform, project::Project,
    target::ExtensionTarget,
};

pub use deps::{DependencyManifest, SearchPath};
pub use util::context::GlobalContext;
