//! Core data structures for extbuild.
//!
//! - Extension targets and the project manifest that declares them
//! - Projects (a manifest plus its root directory)
//! - Host platform identification
//! - Tool versions
//! - Build-fatal errors

pub mod errors;
pub mod manifest;
pub mod platform;
pub mod project;
pub mod target;
pub mod version;

pub use errors::{BuildError, BuildStep};
pub use manifest::{Manifest, MANIFEST_NAME};
pub use platform::{HostOs, Platform, PointerWidth};
pub use project::Project;
pub use target::ExtensionTarget;
pub use version::ToolVersion;
