//! Data-file manifest assembly.
//!
//! The manifest maps installation subdirectories to the shared libraries
//! that must be installed there, in the shape packaging front ends accept
//! as `data_files`: `[["poppler/cpp", ["C:/.../poppler.dll", ...]], ...]`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::manifest::{AliasSpec, BinaryDepsSpec};
use crate::deps::search::{AliasOutcome, SearchPath};
use crate::util::fs::relative_path;

/// One `(install_dir, files)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataFileEntry(pub String, pub Vec<PathBuf>);

impl DataFileEntry {
    pub fn files(&self) -> &[PathBuf] {
        &self.1
    }
}

/// Installation subdirectory -> ordered list of resolved files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyManifest {
    entries: Vec<DataFileEntry>,
}

impl DependencyManifest {
    pub fn new() -> Self {
        DependencyManifest::default()
    }

    /// The file list for `install_dir`, creating an empty entry if needed.
    pub fn entry(&mut self, install_dir: &str) -> &mut Vec<PathBuf> {
        let index = match self.entries.iter().position(|e| e.0 == install_dir) {
            Some(index) => index,
            None => {
                self.entries
                    .push(DataFileEntry(install_dir.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    pub fn entries(&self) -> &[DataFileEntry] {
        &self.entries
    }

    /// Files for one installation subdirectory.
    pub fn files(&self, install_dir: &str) -> Option<&[PathBuf]> {
        self.entries
            .iter()
            .find(|e| e.0 == install_dir)
            .map(DataFileEntry::files)
    }

    /// Rewrite every file path relative to `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        for entry in &mut self.entries {
            for file in &mut entry.1 {
                *file = relative_path(base, file);
            }
        }
        self
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the declared aliases, then resolve every required library in order.
///
/// Aliases go first because a required name may only exist once its alias
/// has been copied into place. The first failure aborts the whole assembly.
pub fn assemble(spec: &BinaryDepsSpec, search: &SearchPath) -> Result<DependencyManifest> {
    for AliasSpec { from, to } in &spec.aliases {
        if let AliasOutcome::Created(path) = search.ensure_alias(from, to)? {
            tracing::debug!("created alias {}", path.display());
        }
    }

    let mut manifest = DependencyManifest::new();
    let files = manifest.entry(&spec.install_dir);
    for name in &spec.libraries {
        files.push(search.locate(name)?);
    }

    tracing::info!(
        "Resolved {} librar{} for {}",
        spec.libraries.len(),
        if spec.libraries.len() == 1 { "y" } else { "ies" },
        spec.install_dir
    );

    Ok(manifest)
}
