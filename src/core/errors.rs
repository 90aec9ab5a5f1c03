//! Build-fatal error types and diagnostics.
//!
//! Every variant aborts the whole package build; there is no recoverable tier.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::version::ToolVersion;
use crate::util::diagnostic::Diagnostic;

/// The external CMake invocation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Configure,
    Build,
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStep::Configure => write!(f, "configure"),
            BuildStep::Build => write!(f, "build"),
        }
    }
}

/// Error raised by build orchestration or binary dependency resolution.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error("{tool} must be installed to build the following extensions: {}", .extensions.join(", "))]
    #[diagnostic(code(extbuild::tool_missing))]
    ToolMissing {
        tool: String,
        extensions: Vec<String>,
        reason: String,
    },

    #[error("{tool} >= {required} is required on {platform}, found {found}")]
    #[diagnostic(code(extbuild::tool_too_old))]
    ToolTooOld {
        tool: String,
        required: ToolVersion,
        found: ToolVersion,
        platform: String,
    },

    #[error("{step} step for `{target}` failed with {}", describe_exit(.exit_code))]
    #[diagnostic(code(extbuild::process_failed))]
    ProcessFailed {
        step: BuildStep,
        target: String,
        exit_code: Option<i32>,
        scratch_dir: PathBuf,
    },

    #[error("could not find required library `{name}`")]
    #[diagnostic(code(extbuild::library_not_found))]
    LibraryNotFound { name: String, searched: Vec<PathBuf> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}

impl BuildError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = match self {
            BuildError::ToolMissing { tool, reason, .. } => Diagnostic::error(self.to_string())
                .with_context(reason.clone())
                .with_suggestion(format!("Install {} and ensure it's in your PATH", tool))
                .with_suggestion(format!(
                    "Point `build.cmake` in .extbuild/config.toml at the {} executable",
                    tool
                )),

            BuildError::ToolTooOld { tool, required, .. } => Diagnostic::error(self.to_string())
                .with_suggestion(format!("Upgrade {} to {} or newer", tool, required)),

            BuildError::ProcessFailed { scratch_dir, .. } => Diagnostic::error(self.to_string())
                .with_context(format!(
                    "build directory left in place for inspection: {}",
                    scratch_dir.display()
                ))
                .with_suggestion("Re-run with --verbose to see the full CMake command line"),

            BuildError::LibraryNotFound { searched, .. } => {
                let mut diag = Diagnostic::error(self.to_string());
                if searched.is_empty() {
                    diag = diag.with_context("no search paths are configured");
                }
                for dir in searched {
                    diag = diag.with_context(format!("searched {}", dir.display()));
                }
                diag.with_suggestion(
                    "Add the directory containing it to `binary-deps.search-paths` in Extbuild.toml",
                )
            }
        };

        match MietteDiagnostic::code(self) {
            Some(code) => diag.with_code(code.to_string()),
            None => diag,
        }
    }
}
