//! Project - a loaded manifest and the directory it lives in.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::core::manifest::Manifest;
use crate::core::target::ExtensionTarget;

/// A project rooted at the directory containing `Extbuild.toml`.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    manifest: Manifest,
}

impl Project {
    /// Load a project from a manifest path.
    pub fn load(manifest_path: &Path) -> Result<Self> {
        let manifest = Manifest::load(manifest_path)?;
        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        Ok(Project::new(root, manifest))
    }

    pub fn new(root: impl Into<PathBuf>, manifest: Manifest) -> Self {
        Project {
            root: root.into(),
            manifest,
        }
    }

    /// Get the project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Declared extension targets with absolute source directories.
    pub fn targets(&self) -> Vec<ExtensionTarget> {
        self.manifest.extension_targets(&self.root)
    }

    /// Default root for compiled modules.
    pub fn default_lib_dir(&self) -> PathBuf {
        self.root.join("build").join("lib")
    }

    /// Default CMake scratch directory.
    pub fn default_build_dir(&self) -> PathBuf {
        self.root.join("build").join("temp")
    }
}
