//! Implementation of `extbuild build`.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::builder::{strategy_for, BuildContext, CMakeBuilder};
use crate::core::platform::{HostOs, Platform, PointerWidth};
use crate::core::target::ExtensionTarget;
use crate::core::Project;
use crate::util::config::Config;
use crate::util::fs::absolutize;
use crate::util::process::{find_cmake, find_python, Executor};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Build the Debug configuration
    pub debug: bool,

    /// Specific extensions to build (empty = all)
    pub targets: Vec<String>,

    /// Root the compiled modules are placed under
    pub lib_dir: Option<PathBuf>,

    /// CMake scratch directory
    pub build_dir: Option<PathBuf>,

    /// Interpreter to build against
    pub interpreter: Option<PathBuf>,

    /// Explicit CMake executable
    pub cmake: Option<PathBuf>,

    /// Override the detected operating system
    pub os: Option<HostOs>,

    /// Override the interpreter's pointer width instead of probing it
    pub pointer_width: Option<PointerWidth>,

    /// Job count for single-configuration builds
    pub jobs: Option<u32>,
}

/// An extension that was configured and built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltExtension {
    pub name: String,
    pub output_dir: PathBuf,
}

/// Validate that all requested targets are declared in the manifest.
fn select_targets(all: Vec<ExtensionTarget>, requested: &[String]) -> Result<Vec<ExtensionTarget>> {
    if requested.is_empty() {
        return Ok(all);
    }

    for name in requested {
        if !all.iter().any(|t| t.name() == name) {
            bail!(
                "unknown extension `{}`\n\
                 available extensions: {}",
                name,
                if all.is_empty() {
                    "(none)".to_string()
                } else {
                    all.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
                }
            );
        }
    }

    Ok(all
        .into_iter()
        .filter(|t| requested.iter().any(|r| r == t.name()))
        .collect())
}

/// Build the context every target shares. Platform facts are read here, once.
fn build_context(
    project: &Project,
    config: &Config,
    opts: &BuildOptions,
    executor: &dyn Executor,
) -> Result<BuildContext> {
    let root = project.root();

    let interpreter = match opts.interpreter.clone().or_else(find_python) {
        Some(path) => path,
        None => bail!(
            "no Python interpreter found\n\
             hint: pass --interpreter <path>"
        ),
    };

    let pointer_width = opts
        .pointer_width
        .unwrap_or_else(|| PointerWidth::probe(executor, &interpreter));
    let platform = Platform::new(opts.os.unwrap_or_else(HostOs::host), pointer_width);

    let cmake = opts
        .cmake
        .clone()
        .or_else(|| config.build.cmake.clone())
        .or_else(find_cmake)
        .unwrap_or_else(|| PathBuf::from("cmake"));

    let lib_dir = opts
        .lib_dir
        .clone()
        .or_else(|| config.build.lib_dir.clone())
        .map(|p| absolutize(root, &p))
        .unwrap_or_else(|| project.default_lib_dir());

    let build_dir = opts
        .build_dir
        .clone()
        .or_else(|| config.build.build_dir.clone())
        .map(|p| absolutize(root, &p))
        .unwrap_or_else(|| project.default_build_dir());

    Ok(BuildContext::new(
        platform,
        lib_dir,
        build_dir,
        interpreter,
        &project.manifest().package.version,
    )
    .with_debug(opts.debug)
    .with_cmake(cmake))
}

/// Build every selected extension of `project`.
///
/// CMake is probed before any target is touched; the first failing step
/// aborts the whole build.
pub fn build(
    project: &Project,
    config: &Config,
    opts: &BuildOptions,
    executor: &dyn Executor,
) -> Result<Vec<BuiltExtension>> {
    let targets = select_targets(project.targets(), &opts.targets)?;
    if targets.is_empty() {
        tracing::warn!("no extensions declared in the manifest; nothing to build");
        return Ok(Vec::new());
    }

    let ctx = build_context(project, config, opts, executor)?;
    let strategy = strategy_for(&ctx.platform, opts.jobs.unwrap_or_else(|| config.jobs()));
    tracing::debug!("platform {} -> {} strategy", ctx.platform, strategy.name());

    let builder = CMakeBuilder::new(&ctx, strategy.as_ref(), executor);
    let version = builder.probe(&targets)?;
    if let Some(version) = version {
        tracing::info!("Using CMake {}", version);
    }

    let mut built = Vec::with_capacity(targets.len());
    for target in &targets {
        if !target.has_cmake_lists() {
            tracing::warn!(
                "no CMakeLists.txt in {}; configure will likely fail",
                target.source_dir().display()
            );
        }
        let output_dir = builder.build(target)?;
        built.push(BuiltExtension {
            name: target.name().to_string(),
            output_dir,
        });
    }

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::BuildError;
    use crate::core::manifest::Manifest;
    use crate::test_support::{MockExecutor, MockProcessOutput};
    use tempfile::TempDir;

    fn project(root: &std::path::Path) -> Project {
        let manifest = Manifest::parse(
            "[package]\nname = \"p\"\nversion = \"0.3.0\"\n\n\
             [[extension]]\nname = \"p.one\"\nsource-dir = \"one\"\n\n\
             [[extension]]\nname = \"p.two\"\nsource-dir = \"two\"\n",
        )
        .unwrap();
        Project::new(root, manifest)
    }

    fn opts(os: HostOs) -> BuildOptions {
        BuildOptions {
            interpreter: Some(PathBuf::from("/usr/bin/python3")),
            cmake: Some(PathBuf::from("cmake")),
            os: Some(os),
            pointer_width: Some(PointerWidth::Bits64),
            ..Default::default()
        }
    }

    #[test]
    fn test_builds_every_target_in_order() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.16.3"));
        exec.set_default(MockProcessOutput::success(""));

        let built = build(&project, &Config::default(), &opts(HostOs::Unix), &exec).unwrap();

        assert_eq!(built.len(), 2);
        assert_eq!(built[0].output_dir, tmp.path().join("build").join("lib").join("p"));

        let lines = exec.call_lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "cmake --version");
        assert!(lines[1].starts_with(&format!("cmake {}", tmp.path().join("one").display())));
        assert!(lines[2].starts_with("cmake --build ."));
        assert!(lines[3].starts_with(&format!("cmake {}", tmp.path().join("two").display())));
        assert!(lines[4].starts_with("cmake --build ."));
    }

    #[test]
    fn test_missing_cmake_aborts_before_any_target() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::not_found());

        let err = build(&project, &Config::default(), &opts(HostOs::Unix), &exec).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ToolMissing { .. })
        ));
        assert_eq!(exec.calls().len(), 1);
        assert!(!tmp.path().join("build").exists());
    }

    #[test]
    fn test_old_cmake_on_windows_never_builds() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.0.2"));
        exec.set_default(MockProcessOutput::success(""));

        let err = build(&project, &Config::default(), &opts(HostOs::Windows), &exec).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::ToolTooOld { .. })
        ));
        assert!(!exec.call_lines().iter().any(|l| l.contains("--build")));
    }

    #[test]
    fn test_first_failure_stops_remaining_targets() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.16.3"));
        exec.expect_prefix("cmake --build", MockProcessOutput::failure(2, ""));
        exec.set_default(MockProcessOutput::success(""));

        assert!(build(&project, &Config::default(), &opts(HostOs::Unix), &exec).is_err());

        let lines = exec.call_lines();
        assert_eq!(lines.len(), 3);
        assert!(!lines.iter().any(|l| l.contains(&tmp.path().join("two").display().to_string())));
    }

    #[test]
    fn test_target_filter() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.16.3"));
        exec.set_default(MockProcessOutput::success(""));

        let mut options = opts(HostOs::Unix);
        options.targets = vec!["p.two".to_string()];
        let built = build(&project, &Config::default(), &options, &exec).unwrap();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].name, "p.two");

        options.targets = vec!["p.three".to_string()];
        let err = build(&project, &Config::default(), &options, &exec).unwrap_err();
        assert!(err.to_string().contains("unknown extension `p.three`"));
    }

    #[test]
    fn test_config_jobs_and_dirs() {
        let tmp = TempDir::new().unwrap();
        let project = project(tmp.path());
        let exec = MockExecutor::new();
        exec.expect("cmake --version", MockProcessOutput::success("cmake version 3.16.3"));
        exec.set_default(MockProcessOutput::success(""));

        let mut config = Config::default();
        config.build.jobs = Some(8);
        config.build.build_dir = Some(PathBuf::from("scratch"));

        let mut options = opts(HostOs::Unix);
        options.targets = vec!["p.one".to_string()];
        build(&project, &config, &options, &exec).unwrap();

        let calls = exec.calls();
        assert!(calls[2].get_args().contains(&"-j8".to_string()));
        assert_eq!(
            calls[2].get_cwd(),
            Some(tmp.path().join("scratch").join("p.one").as_path())
        );
    }
}
