//! Parley CLI binary entrypoint.
//!
//! This is the main entry point for the `parley` command-line tool.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_cli::cli::{Cli, Commands};
use parley_cli::commands::{ShowModelCommand, SimulateCommand, TournamentCommand};
use parley_cli::output::OutputFormat;

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::new(cli.format);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Simulate(args) => {
            let cmd = SimulateCommand::new(cli.storage_dir);
            cmd.execute(&mut stdout, &format, &args)
                .context("simulation failed")?;
        }
        Commands::Tournament(args) => {
            let cmd = TournamentCommand::new(cli.storage_dir);
            cmd.execute(&mut stdout, &format, &args)
                .context("tournament failed")?;
        }
        Commands::ShowModel(args) => {
            let cmd = ShowModelCommand::new(cli.storage_dir);
            cmd.execute(&mut stdout, &format, &args)
                .context("cannot show opponent model")?;
        }
    }

    Ok(())
}
