//! `extbuild deps` command

use anyhow::Result;

use crate::cli::DepsArgs;
use extbuild::core::Project;
use extbuild::ops::{resolve_deps, DepsOptions};
use extbuild::util::fs::write_string;
use extbuild::util::GlobalContext;

pub fn execute(args: DepsArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest_path = ctx.find_manifest()?;
    let project = Project::load(&manifest_path)?;
    let config = ctx.load_config(project.root());

    let opts = DepsOptions {
        search_paths: args.search_paths,
        force: args.force,
        os: args.platform,
        relative: args.relative,
    };

    let manifest = resolve_deps(&project, &config, &opts)?;
    let json = manifest.to_json()?;

    match args.output {
        Some(path) => {
            write_string(&path, &json)?;
            let count: usize = manifest.entries().iter().map(|e| e.files().len()).sum();
            eprintln!("     Wrote {} ({} files)", path.display(), count);
        }
        None => println!("{}", json),
    }

    Ok(())
}
