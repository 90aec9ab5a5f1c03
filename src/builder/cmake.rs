//! CMake driver for native extension targets.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::context::{BuildContext, CXXFLAGS_VAR};
use crate::builder::strategy::PlatformStrategy;
use crate::core::errors::{BuildError, BuildStep};
use crate::core::target::ExtensionTarget;
use crate::core::version::ToolVersion;
use crate::util::fs::ensure_dir;
use crate::util::process::{Executor, ProcessBuilder};

/// Runs `cmake` configure + build for extension targets.
pub struct CMakeBuilder<'a> {
    ctx: &'a BuildContext,
    strategy: &'a dyn PlatformStrategy,
    executor: &'a dyn Executor,
}

impl<'a> CMakeBuilder<'a> {
    /// Create a new CMake builder.
    pub fn new(
        ctx: &'a BuildContext,
        strategy: &'a dyn PlatformStrategy,
        executor: &'a dyn Executor,
    ) -> Self {
        CMakeBuilder {
            ctx,
            strategy,
            executor,
        }
    }

    /// Run `cmake --version` and check it against the platform minimum.
    ///
    /// `targets` only feeds the error message. Returns the parsed version
    /// when the output contains one.
    pub fn probe(&self, targets: &[ExtensionTarget]) -> Result<Option<ToolVersion>, BuildError> {
        let missing = |reason: String| BuildError::ToolMissing {
            tool: "CMake".to_string(),
            extensions: targets.iter().map(|t| t.name().to_string()).collect(),
            reason,
        };

        let cmd = ProcessBuilder::new(&self.ctx.cmake).arg("--version");
        let output = self
            .executor
            .output(&cmd)
            .map_err(|e| missing(format!("{:#}", e)))?;

        if !output.success() {
            return Err(missing(format!(
                "`{}` exited with {:?}",
                cmd.display_command(),
                output.code
            )));
        }

        let version = ToolVersion::from_probe_output(&output.stdout);
        tracing::debug!("cmake probe: {:?}", version);

        if let Some(required) = self.strategy.min_cmake_version() {
            let found = version.clone().ok_or_else(|| {
                missing(format!(
                    "could not read a version from `{}` output",
                    cmd.display_command()
                ))
            })?;
            if found < required {
                return Err(BuildError::ToolTooOld {
                    tool: "CMake".to_string(),
                    required,
                    found,
                    platform: self.ctx.platform.os.to_string(),
                });
            }
        }

        Ok(version)
    }

    /// Configure and build one target. Returns the directory the compiled
    /// module was written to.
    pub fn build(&self, target: &ExtensionTarget) -> Result<PathBuf> {
        let scratch = self.ctx.scratch_dir(target.name());
        ensure_dir(&scratch)?;

        let args = self.strategy.compute_args(target, self.ctx);
        tracing::debug!("{} args for `{}`: {:?}", self.strategy.name(), target, args);

        let cxxflags = self.ctx.cxxflags();

        tracing::info!("Configuring `{}`", target);
        let configure = ProcessBuilder::new(&self.ctx.cmake)
            .arg(target.source_dir())
            .args(&args.configure)
            .env(CXXFLAGS_VAR, &cxxflags)
            .cwd(&scratch);
        self.run_step(BuildStep::Configure, target, &configure)?;

        tracing::info!("Building `{}` ({})", target, self.ctx.config_name());
        let build = ProcessBuilder::new(&self.ctx.cmake)
            .args(["--build", "."])
            .args(&args.build)
            .env(CXXFLAGS_VAR, &cxxflags)
            .cwd(&scratch);
        self.run_step(BuildStep::Build, target, &build)?;

        Ok(target.output_dir(&self.ctx.lib_dir))
    }

    fn run_step(&self, step: BuildStep, target: &ExtensionTarget, cmd: &ProcessBuilder) -> Result<()> {
        let code = self.executor.status(cmd)?;
        if code != Some(0) {
            return Err(BuildError::ProcessFailed {
                step,
                target: target.name().to_string(),
                exit_code: code,
                scratch_dir: self.ctx.scratch_dir(target.name()),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::strategy::{MultiConfigStrategy, SingleConfigStrategy};
    use crate::core::platform::{HostOs, Platform, PointerWidth};
    use crate::test_support::{MockExecutor, MockProcessOutput};
    use tempfile::TempDir;

    fn ctx(tmp: &TempDir, os: HostOs) -> BuildContext {
        BuildContext::new(
            Platform::new(os, PointerWidth::Bits64),
            tmp.path().join("lib"),
            tmp.path().join("temp"),
            "/usr/bin/python3",
            "1.0.0",
        )
        .with_base_cxxflags(Some("-O2".to_string()))
    }

    fn target() -> ExtensionTarget {
        ExtensionTarget::new("pkg.ext", "/src/pkg")
    }

    #[test]
    fn test_configure_runs_before_build() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Unix);
        let strategy = SingleConfigStrategy::new(2);
        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));

        let out = CMakeBuilder::new(&ctx, &strategy, &exec)
            .build(&target())
            .unwrap();

        let calls = exec.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].get_args()[0], "/src/pkg");
        assert_eq!(&calls[1].get_args()[..2], ["--build", "."]);
        assert_eq!(out, tmp.path().join("lib").join("pkg"));
    }

    #[test]
    fn test_scratch_dir_created_and_used_as_cwd() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Unix);
        let strategy = SingleConfigStrategy::new(2);
        let exec = MockExecutor::new();
        exec.set_default(MockProcessOutput::success(""));

        CMakeBuilder::new(&ctx, &strategy, &exec)
            .build(&target())
            .unwrap();

        let scratch = ctx.scratch_dir("pkg.ext");
        assert!(scratch.is_dir());
        for call in exec.calls() {
            assert_eq!(call.get_cwd(), Some(scratch.as_path()));
            assert_eq!(
                call.get_env("CXXFLAGS"),
                Some("-O2 -DVERSION_INFO=\\\"1.0.0\\\"")
            );
        }
    }

    #[test]
    fn test_configure_failure_skips_build() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Unix);
        let strategy = SingleConfigStrategy::new(2);
        let exec = MockExecutor::new();
        exec.expect_prefix("cmake /src/pkg", MockProcessOutput::failure(1, ""));
        exec.set_default(MockProcessOutput::success(""));

        let err = CMakeBuilder::new(&ctx, &strategy, &exec)
            .build(&target())
            .unwrap_err();

        match err.downcast_ref::<BuildError>() {
            Some(BuildError::ProcessFailed { step, exit_code, .. }) => {
                assert_eq!(*step, BuildStep::Configure);
                assert_eq!(*exit_code, Some(1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn test_build_failure_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Unix);
        let strategy = SingleConfigStrategy::new(2);
        let exec = MockExecutor::new();
        exec.expect_prefix("cmake --build", MockProcessOutput::failure(2, ""));
        exec.set_default(MockProcessOutput::success(""));

        let err = CMakeBuilder::new(&ctx, &strategy, &exec)
            .build(&target())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ProcessFailed { step: BuildStep::Build, exit_code: Some(2), .. })
        ));
    }

    #[test]
    fn test_probe_missing_tool() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Unix);
        let strategy = SingleConfigStrategy::new(2);
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::not_found());

        let err = CMakeBuilder::new(&ctx, &strategy, &exec)
            .probe(&[target()])
            .unwrap_err();

        match err {
            BuildError::ToolMissing { extensions, .. } => assert_eq!(extensions, vec!["pkg.ext"]),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_probe_old_cmake_on_windows() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Windows);
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 2.8.12\n"));

        let err = CMakeBuilder::new(&ctx, &MultiConfigStrategy, &exec)
            .probe(&[target()])
            .unwrap_err();

        assert!(matches!(err, BuildError::ToolTooOld { .. }));
    }

    #[test]
    fn test_probe_old_cmake_is_fine_on_unix() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Unix);
        let strategy = SingleConfigStrategy::new(2);
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 2.8.12\n"));

        let version = CMakeBuilder::new(&ctx, &strategy, &exec)
            .probe(&[target()])
            .unwrap();
        assert_eq!(version, Some("2.8.12".parse().unwrap()));
    }

    #[test]
    fn test_probe_unparseable_version_on_windows() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp, HostOs::Windows);
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("garbage"));

        let err = CMakeBuilder::new(&ctx, &MultiConfigStrategy, &exec)
            .probe(&[target()])
            .unwrap_err();
        assert!(matches!(err, BuildError::ToolMissing { .. }));
    }
}
