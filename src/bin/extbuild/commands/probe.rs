//! `extbuild probe` command

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::ProbeArgs;
use extbuild::core::{HostOs, Platform, PointerWidth};
use extbuild::ops::{format_report, probe};
use extbuild::util::process::{find_cmake, SystemExecutor};

pub fn execute(args: ProbeArgs) -> Result<()> {
    let os = args.platform.unwrap_or_else(HostOs::host);

    let cmake = args
        .cmake
        .or_else(find_cmake)
        .unwrap_or_else(|| PathBuf::from("cmake"));

    let report = probe(Platform::new(os, PointerWidth::host()), cmake, &SystemExecutor);
    print!("{}", format_report(&report));

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}
