//! extbuild CLI - CMake-driven builds for native extension modules

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use extbuild::core::BuildError;
use extbuild::util::diagnostic::emit;

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::IsTerminal::is_terminal(&std::io::stderr());

    if let Err(e) = run(cli) {
        match e.downcast_ref::<BuildError>() {
            Some(err) => emit(&err.to_diagnostic(), color),
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("extbuild=debug")
    } else {
        EnvFilter::new("extbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Commands::Build(args) => commands::build::execute(args),
        Commands::Deps(args) => commands::deps::execute(args),
        Commands::Probe(args) => commands::probe::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
