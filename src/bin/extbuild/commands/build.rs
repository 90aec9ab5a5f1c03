//! `extbuild build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use extbuild::core::Project;
use extbuild::ops::{build, BuildOptions};
use extbuild::util::process::SystemExecutor;
use extbuild::util::GlobalContext;

pub fn execute(args: BuildArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.find_manifest()?;
    let project = Project::load(&manifest_path)?;
    let config = ctx.load_config(project.root());

    let opts = BuildOptions {
        debug: args.debug,
        targets: args.target,
        lib_dir: args.lib_dir,
        build_dir: args.build_dir,
        interpreter: args.interpreter,
        cmake: args.cmake,
        os: args.platform,
        pointer_width: args.pointer_width,
        jobs: args.jobs,
    };

    let built = build(&project, &config, &opts, &SystemExecutor)?;

    for ext in &built {
        eprintln!("    Finished `{}` -> {}", ext.name, ext.output_dir.display());
    }

    Ok(())
}
