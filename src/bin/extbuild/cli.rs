//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use extbuild::core::{HostOs, PointerWidth};

/// extbuild - CMake-driven builds for native extension modules
#[derive(Parser)]
#[command(name = "extbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Configure and build every extension with CMake
    Build(BuildArgs),

    /// Resolve bundled shared libraries into a data-file manifest
    Deps(DepsArgs),

    /// Check that CMake is usable on this platform
    Probe(ProbeArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Build the Debug configuration
    #[arg(long)]
    pub debug: bool,

    /// Specific extensions to build
    #[arg(long)]
    pub target: Vec<String>,

    /// Directory compiled modules are placed under
    #[arg(long)]
    pub lib_dir: Option<PathBuf>,

    /// CMake scratch directory
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Interpreter to build against
    #[arg(long, env = "EXTBUILD_INTERPRETER")]
    pub interpreter: Option<PathBuf>,

    /// CMake executable
    #[arg(long, env = "EXTBUILD_CMAKE")]
    pub cmake: Option<PathBuf>,

    /// Target platform (windows or unix)
    #[arg(long, value_parser = clap::value_parser!(HostOs))]
    pub platform: Option<HostOs>,

    /// Interpreter pointer width (32 or 64); probed when omitted
    #[arg(long, value_parser = clap::value_parser!(PointerWidth))]
    pub pointer_width: Option<PointerWidth>,

    /// Job count for single-configuration generators
    #[arg(short, long)]
    pub jobs: Option<u32>,
}

#[derive(Args)]
pub struct DepsArgs {
    /// Write the manifest here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Additional search path (lowest priority, repeatable)
    #[arg(long = "search-path")]
    pub search_paths: Vec<PathBuf>,

    /// Resolve even when the platform does not need it
    #[arg(long)]
    pub force: bool,

    /// Target platform (windows or unix)
    #[arg(long, value_parser = clap::value_parser!(HostOs))]
    pub platform: Option<HostOs>,

    /// Emit paths relative to the project root
    #[arg(long)]
    pub relative: bool,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// CMake executable
    #[arg(long, env = "EXTBUILD_CMAKE")]
    pub cmake: Option<PathBuf>,

    /// Target platform (windows or unix)
    #[arg(long, value_parser = clap::value_parser!(HostOs))]
    pub platform: Option<HostOs>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
