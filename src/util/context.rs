//! Global context for extbuild operations.
//!
//! Provides centralized access to configuration paths and the working directory.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::BaseDirs;

use crate::core::manifest::MANIFEST_NAME;
use crate::util::config::{load_config, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global extbuild data (~/.extbuild/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let home = BaseDirs::new()
            .map(|b| b.home_dir().join(".extbuild"))
            .unwrap_or_else(|| PathBuf::from(".extbuild"));

        GlobalContext { cwd, home }
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Project-local configuration path for a project rooted at `root`.
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".extbuild").join("config.toml")
    }

    /// Load merged global + project configuration.
    pub fn load_config(&self, project_root: &Path) -> Config {
        load_config(&self.config_path(), &Self::project_config_path(project_root))
    }

    /// Find Extbuild.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                bail!(
                    "could not find `{}` in `{}` or any parent directory",
                    MANIFEST_NAME,
                    self.cwd.display()
                );
            }
        }
    }
}
