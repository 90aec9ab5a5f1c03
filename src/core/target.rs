//! Extension targets - what gets built.

use std::fmt;
use std::path::{Path, PathBuf};

/// One native extension module to build with CMake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionTarget {
    name: String,
    source_dir: PathBuf,
}

impl ExtensionTarget {
    /// Create a target. `source_dir` should already be absolute.
    pub fn new(name: impl Into<String>, source_dir: impl Into<PathBuf>) -> Self {
        ExtensionTarget {
            name: name.into(),
            source_dir: source_dir.into(),
        }
    }

    /// Dot-qualified module name, e.g. `poppler.cpp.modules`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory containing the top-level `CMakeLists.txt`.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Directory the compiled module must land in under `lib_dir`.
    ///
    /// Every dotted component except the last becomes a path segment, so
    /// `poppler.cpp.modules` maps to `<lib_dir>/poppler/cpp`.
    pub fn output_dir(&self, lib_dir: &Path) -> PathBuf {
        let mut parts: Vec<&str> = self.name.split('.').collect();
        parts.pop();
        parts
            .into_iter()
            .fold(lib_dir.to_path_buf(), |dir, part| dir.join(part))
    }

    /// Whether the source directory looks like a CMake project.
    pub fn has_cmake_lists(&self) -> bool {
        self.source_dir.join("CMakeLists.txt").exists()
    }
}

impl fmt::Display for ExtensionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
