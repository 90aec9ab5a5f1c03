//! Implementation of `extbuild deps`.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::platform::HostOs;
use crate::core::Project;
use crate::deps::{assemble, DependencyManifest, SearchPath};
use crate::util::config::Config;
use crate::util::fs::absolutize;

/// Options for binary dependency resolution.
#[derive(Debug, Clone, Default)]
pub struct DepsOptions {
    /// Extra search paths, searched after the manifest's and config's
    pub search_paths: Vec<PathBuf>,

    /// Resolve even when the target OS bundles shared libraries itself
    pub force: bool,

    /// Override the detected operating system
    pub os: Option<HostOs>,

    /// Emit paths relative to the project root
    pub relative: bool,
}

/// Search order: manifest, then config, then command line.
pub fn search_path(project: &Project, config: &Config, opts: &DepsOptions) -> SearchPath {
    let root = project.root();
    let mut search = SearchPath::default();

    if let Some(ref deps) = project.manifest().binary_deps {
        search.extend(deps.search_paths.iter().map(|p| absolutize(root, p)));
    }
    search.extend(
        config
            .deps
            .extra_search_paths
            .iter()
            .map(|p| absolutize(root, p)),
    );
    search.extend(opts.search_paths.iter().map(|p| absolutize(root, p)));

    search
}

/// Resolve the project's binary dependencies into a data-file manifest.
///
/// Only Windows needs this; elsewhere an empty manifest is returned unless
/// `force` is set.
pub fn resolve_deps(
    project: &Project,
    config: &Config,
    opts: &DepsOptions,
) -> Result<DependencyManifest> {
    let Some(ref spec) = project.manifest().binary_deps else {
        tracing::info!("no [binary-deps] declared; nothing to resolve");
        return Ok(DependencyManifest::new());
    };

    let os = opts.os.unwrap_or_else(HostOs::host);
    if os != HostOs::Windows && !opts.force {
        tracing::info!("skipping binary dependency resolution on {}", os);
        return Ok(DependencyManifest::new());
    }

    let search = search_path(project, config, opts);
    tracing::debug!("search path: {:?}", search.dirs());

    let manifest = assemble(spec, &search)?;
    if opts.relative {
        Ok(manifest.relative_to(project.root()))
    } else {
        Ok(manifest)
    }
}
