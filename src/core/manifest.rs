//! Extbuild.toml manifest parsing and schema.
//!
//! The manifest declares the package version, the CMake-built extension
//! targets, and the shared libraries that must be bundled alongside them.
//!
//! ```toml
//! [package]
//! name = "python-poppler"
//! version = "0.2.1"
//!
//! [[extension]]
//! name = "poppler.cpp.modules"
//! source-dir = "."
//!
//! [binary-deps]
//! install-dir = "poppler/cpp"
//! search-paths = ['C:\lib\poppler\Library\bin', 'C:\lib\libiconv\Library\bin']
//! libraries = ["poppler-cpp.dll", "poppler.dll", "iconv.dll"]
//!
//! [[binary-deps.alias]]
//! from = "libiconv.dll"
//! to = "iconv.dll"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::target::ExtensionTarget;
use crate::util::fs::{absolutize, read_to_string};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Extbuild.toml";

/// Parsed project manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    pub package: PackageMeta,

    #[serde(default, rename = "extension")]
    pub extensions: Vec<ExtensionSpec>,

    #[serde(default)]
    pub binary_deps: Option<BinaryDepsSpec>,
}

/// `[package]` section. Only what the build needs; the rest of the metadata
/// belongs to the packaging front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMeta {
    pub name: String,
    pub version: String,
}

/// `[[extension]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionSpec {
    /// Dot-qualified module name
    pub name: String,

    /// Directory containing CMakeLists.txt, relative to the manifest
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `[binary-deps]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BinaryDepsSpec {
    /// Installation subdirectory inside the package
    pub install_dir: String,

    /// Candidate directories, highest priority first
    #[serde(default)]
    pub search_paths: Vec<PathBuf>,

    /// Required library file names, in bundling order
    #[serde(default)]
    pub libraries: Vec<String>,

    /// Libraries distributed under one name but linked under another
    #[serde(default, rename = "alias")]
    pub aliases: Vec<AliasSpec>,
}

/// `[[binary-deps.alias]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasSpec {
    pub from: String,
    pub to: String,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        let manifest = Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
        Ok(manifest)
    }

    /// Parse and validate manifest contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        for ext in &self.extensions {
            if ext.name.is_empty() || ext.name.split('.').any(str::is_empty) {
                bail!("invalid extension name `{}`", ext.name);
            }
        }

        if let Some(ref deps) = self.binary_deps {
            if deps.install_dir.trim().is_empty() {
                bail!("`binary-deps.install-dir` must not be empty");
            }
            for alias in &deps.aliases {
                if alias.from == alias.to {
                    bail!("alias `{}` maps a library onto itself", alias.from);
                }
            }
        }

        Ok(())
    }

    /// Extension targets with source directories resolved against `root`.
    pub fn extension_targets(&self, root: &Path) -> Vec<ExtensionTarget> {
        self.extensions
            .iter()
            .map(|ext| ExtensionTarget::new(&ext.name, absolutize(root, &ext.source_dir)))
            .collect()
    }
}
