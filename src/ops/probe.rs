//! Environment checks behind `extbuild probe`.
//!
//! Reports what a build would see: the platform, the CMake executable and
//! its version, and whether that version satisfies the platform minimum.

use std::path::PathBuf;

use crate::builder::{strategy_for, BuildContext, CMakeBuilder};
use crate::core::platform::Platform;
use crate::core::version::ToolVersion;
use crate::util::process::Executor;

/// Result of probing the build environment.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub platform: Platform,
    pub cmake: PathBuf,
    pub version: Option<ToolVersion>,
    pub minimum: Option<ToolVersion>,
    /// Why the environment cannot build, if it cannot
    pub error: Option<String>,
}

impl ProbeReport {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Probe CMake the same way a build would.
pub fn probe(platform: Platform, cmake: PathBuf, executor: &dyn Executor) -> ProbeReport {
    let ctx = BuildContext::new(platform, "", "", "", "").with_cmake(cmake.clone());
    let strategy = strategy_for(&platform, 1);
    let builder = CMakeBuilder::new(&ctx, strategy.as_ref(), executor);

    let (version, error) = match builder.probe(&[]) {
        Ok(version) => (version, None),
        Err(e) => (None, Some(e.to_diagnostic().format(false))),
    };

    ProbeReport {
        platform,
        cmake,
        version,
        minimum: strategy.min_cmake_version(),
        error,
    }
}

/// Format a probe report for display.
pub fn format_report(report: &ProbeReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("platform: {}\n", report.platform));
    out.push_str(&format!("cmake:    {}\n", report.cmake.display()));
    out.push_str(&format!(
        "version:  {}\n",
        report
            .version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "unknown".to_string())
    ));
    if let Some(ref minimum) = report.minimum {
        out.push_str(&format!("minimum:  {}\n", minimum));
    }
    match report.error {
        Some(ref error) => out.push_str(&format!("\n{}", error)),
        None => out.push_str("\nok\n"),
    }
    out
}
