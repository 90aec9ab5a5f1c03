//! Shared-library lookup over an ordered list of candidate directories.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::errors::BuildError;
use crate::util::fs::list_file_names;

/// Candidate directories, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

/// What [`SearchPath::ensure_alias`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasOutcome {
    /// The alias was copied into place.
    Created(PathBuf),
    /// The alias already existed; nothing was written.
    AlreadyPresent(PathBuf),
}

impl SearchPath {
    pub fn new(dirs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        SearchPath {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Append lower-priority directories.
    pub fn extend(&mut self, dirs: impl IntoIterator<Item = impl Into<PathBuf>>) {
        self.dirs.extend(dirs.into_iter().map(Into::into));
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// First directory whose listing contains exactly `name`.
    ///
    /// A directory that cannot be listed is an error, not a miss: a
    /// lower-priority copy must never shadow an unreadable earlier entry.
    fn find_dir(&self, name: &str) -> Result<Option<&Path>> {
        for dir in &self.dirs {
            let names = list_file_names(dir).context("failed to scan library search path")?;
            if names.iter().any(|n| n == name) {
                return Ok(Some(dir.as_path()));
            }
        }
        Ok(None)
    }

    fn not_found(&self, name: &str) -> BuildError {
        BuildError::LibraryNotFound {
            name: name.to_string(),
            searched: self.dirs.clone(),
        }
    }

    /// Resolve `name` to `<dir>/<name>` in the highest-priority directory
    /// containing it. Never writes to the filesystem.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        let dir = self.find_dir(name)?.ok_or_else(|| self.not_found(name))?;
        let path = dir.join(name);
        tracing::debug!("located {} at {}", name, path.display());
        Ok(path)
    }

    /// Make `new_name` available next to `old_name`.
    ///
    /// Finds `old_name` like [`SearchPath::locate`] and copies it to
    /// `new_name` in the same directory unless that file already exists.
    /// The directory must be writable.
    pub fn ensure_alias(&self, old_name: &str, new_name: &str) -> Result<AliasOutcome> {
        let dir = self
            .find_dir(old_name)?
            .ok_or_else(|| self.not_found(old_name))?;

        let source = dir.join(old_name);
        let alias = dir.join(new_name);

        if alias.exists() {
            tracing::debug!("{} already present in {}", new_name, dir.display());
            return Ok(AliasOutcome::AlreadyPresent(alias));
        }

        std::fs::copy(&source, &alias).with_context(|| {
            format!(
                "failed to copy {} to {}",
                source.display(),
                alias.display()
            )
        })?;
        tracing::info!("Copied {} -> {}", old_name, alias.display());

        Ok(AliasOutcome::Created(alias))
    }
}

/// Resolve `name` against `search_paths`. See [`SearchPath::locate`].
pub fn locate(name: &str, search_paths: &SearchPath) -> Result<PathBuf> {
    search_paths.locate(name)
}

/// Ensure `new_name` exists beside `old_name`. See [`SearchPath::ensure_alias`].
pub fn ensure_alias(old_name: &str, new_name: &str, search_paths: &SearchPath) -> Result<AliasOutcome> {
    search_paths.ensure_alias(old_name, new_name)
}
