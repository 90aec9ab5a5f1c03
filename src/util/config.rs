//! Configuration file support for extbuild.
//!
//! Two locations are read:
//! - Global: `~/.extbuild/config.toml` - User-wide defaults
//! - Project: `.extbuild/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default `-j` value passed to single-configuration generators.
pub const DEFAULT_JOBS: u32 = 2;

/// extbuild configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build settings
    pub build: BuildConfig,

    /// Binary dependency settings
    pub deps: DepsConfig,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Explicit path to the cmake executable
    pub cmake: Option<PathBuf>,

    /// Job count for single-configuration generators
    pub jobs: Option<u32>,

    /// Scratch directory for CMake
    pub build_dir: Option<PathBuf>,

    /// Directory compiled modules are placed under
    pub lib_dir: Option<PathBuf>,
}

/// Binary dependency configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DepsConfig {
    /// Searched after the manifest's own search paths
    pub extra_search_paths: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.cmake.is_some() {
            self.build.cmake = other.build.cmake;
        }
        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
        if other.build.build_dir.is_some() {
            self.build.build_dir = other.build.build_dir;
        }
        if other.build.lib_dir.is_some() {
            self.build.lib_dir = other.build.lib_dir;
        }
        if !other.deps.extra_search_paths.is_empty() {
            self.deps.extra_search_paths = other.deps.extra_search_paths;
        }
    }

    /// Job count for single-configuration builds.
    pub fn jobs(&self) -> u32 {
        self.build.jobs.unwrap_or(DEFAULT_JOBS)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.extbuild/config.toml)
/// 2. Global config (~/.extbuild/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();
    config.merge(Config::load_or_default(global_path));
    config.merge(Config::load_or_default(project_path));
    config
}
