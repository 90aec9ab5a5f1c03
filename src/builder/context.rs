//! Build context - platform, profile, and output locations.

use std::path::PathBuf;

use crate::core::platform::Platform;

/// Compiler-flags variable that carries the package version into the build.
pub const CXXFLAGS_VAR: &str = "CXXFLAGS";

/// Ambient inputs shared by every extension target in one build invocation.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Platform identifier, read once at startup
    pub platform: Platform,

    /// Build with the Debug configuration instead of Release
    pub debug: bool,

    /// Root the compiled modules are placed under
    pub lib_dir: PathBuf,

    /// Scratch directory CMake runs in
    pub build_temp: PathBuf,

    /// Interpreter the extension is built against
    pub interpreter: PathBuf,

    /// CMake executable
    pub cmake: PathBuf,

    /// Package version, baked in as `VERSION_INFO`
    pub version: String,

    /// Value of `CXXFLAGS` inherited from the environment
    pub base_cxxflags: Option<String>,
}

impl BuildContext {
    /// Create a context, capturing `CXXFLAGS` from the current environment.
    pub fn new(
        platform: Platform,
        lib_dir: impl Into<PathBuf>,
        build_temp: impl Into<PathBuf>,
        interpreter: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        BuildContext {
            platform,
            debug: false,
            lib_dir: lib_dir.into(),
            build_temp: build_temp.into(),
            interpreter: interpreter.into(),
            cmake: PathBuf::from("cmake"),
            version: version.into(),
            base_cxxflags: std::env::var(CXXFLAGS_VAR).ok(),
        }
    }

    /// Select the Debug configuration.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Use a specific CMake executable.
    pub fn with_cmake(mut self, cmake: impl Into<PathBuf>) -> Self {
        self.cmake = cmake.into();
        self
    }

    /// Override the inherited `CXXFLAGS` value.
    pub fn with_base_cxxflags(mut self, flags: Option<String>) -> Self {
        self.base_cxxflags = flags;
        self
    }

    /// CMake configuration name.
    pub fn config_name(&self) -> &'static str {
        if self.debug {
            "Debug"
        } else {
            "Release"
        }
    }

    /// `CXXFLAGS` for the child processes: the inherited value with the
    /// version define appended.
    pub fn cxxflags(&self) -> String {
        let define = format!("-DVERSION_INFO=\\\"{}\\\"", self.version);
        match self.base_cxxflags.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => format!("{} {}", base, define),
            _ => define,
        }
    }

    /// Scratch directory for one target.
    pub fn scratch_dir(&self, target_name: &str) -> PathBuf {
        self.build_temp.join(target_name)
    }
}
