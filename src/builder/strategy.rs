//! Platform build strategies.
//!
//! Each platform gets one [`PlatformStrategy`] implementation, selected once
//! per build with [`strategy_for`]. Everything platform-specific about the
//! CMake command lines lives here.

use std::fmt;

use crate::builder::context::BuildContext;
use crate::core::platform::{HostOs, Platform};
use crate::core::target::ExtensionTarget;
use crate::core::version::ToolVersion;

/// Arguments for the two CMake invocations of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// Appended after the source directory in `cmake <src> ...`
    pub configure: Vec<String>,
    /// Appended after `cmake --build .`
    pub build: Vec<String>,
}

/// Platform-specific CMake policy.
pub trait PlatformStrategy: fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Oldest CMake this platform accepts, if it checks at all.
    fn min_cmake_version(&self) -> Option<ToolVersion> {
        None
    }

    /// Compute configure and build arguments for one target.
    fn compute_args(&self, target: &ExtensionTarget, ctx: &BuildContext) -> BuildArgs;
}

/// Arguments every platform passes to the configure step.
fn common_configure_args(target: &ExtensionTarget, ctx: &BuildContext) -> Vec<String> {
    vec![
        format!(
            "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}",
            target.output_dir(&ctx.lib_dir).display()
        ),
        format!("-DPYTHON_EXECUTABLE={}", ctx.interpreter.display()),
    ]
}

/// Makefile/Ninja style generators: configuration fixed at configure time.
#[derive(Debug, Clone, Copy)]
pub struct SingleConfigStrategy {
    jobs: u32,
}

impl SingleConfigStrategy {
    pub fn new(jobs: u32) -> Self {
        SingleConfigStrategy { jobs: jobs.max(1) }
    }
}

impl PlatformStrategy for SingleConfigStrategy {
    fn name(&self) -> &'static str {
        "single-config"
    }

    fn compute_args(&self, target: &ExtensionTarget, ctx: &BuildContext) -> BuildArgs {
        let mut configure = common_configure_args(target, ctx);
        configure.push(format!("-DCMAKE_BUILD_TYPE={}", ctx.config_name()));

        let build = vec![
            "--config".to_string(),
            ctx.config_name().to_string(),
            "--".to_string(),
            format!("-j{}", self.jobs),
        ];

        BuildArgs { configure, build }
    }
}

/// Visual Studio generators: configuration chosen at build time.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiConfigStrategy;

impl MultiConfigStrategy {
    /// Minimum CMake for the Visual Studio code path.
    pub const MIN_CMAKE: [u64; 3] = [3, 1, 0];
}

impl PlatformStrategy for MultiConfigStrategy {
    fn name(&self) -> &'static str {
        "multi-config"
    }

    fn min_cmake_version(&self) -> Option<ToolVersion> {
        Some(ToolVersion::new(Self::MIN_CMAKE))
    }

    fn compute_args(&self, target: &ExtensionTarget, ctx: &BuildContext) -> BuildArgs {
        let mut configure = common_configure_args(target, ctx);
        configure.push(format!(
            "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY_{}={}",
            ctx.config_name().to_uppercase(),
            target.output_dir(&ctx.lib_dir).display()
        ));
        if ctx.platform.pointer_width.is_64bit() {
            configure.push("-A".to_string());
            configure.push("x64".to_string());
        }

        let build = vec![
            "--config".to_string(),
            ctx.config_name().to_string(),
            "--".to_string(),
            "/m".to_string(),
        ];

        BuildArgs { configure, build }
    }
}

/// Pick the strategy for a platform.
pub fn strategy_for(platform: &Platform, jobs: u32) -> Box<dyn PlatformStrategy> {
    match platform.os {
        HostOs::Windows => Box::new(MultiConfigStrategy),
        HostOs::Unix => Box::new(SingleConfigStrategy::new(jobs)),
    }
}
