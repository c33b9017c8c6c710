//! Single-session simulation against a reference counterpart.

use std::io::Write;
use std::path::PathBuf;

use parley_agent::OpponentStore;

use super::{Matchup, load_config, load_profile, play};
use crate::cli::SimulateArgs;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Simulate command executor.
pub struct SimulateCommand {
    storage_dir: Option<PathBuf>,
}

impl SimulateCommand {
    /// Create a new simulate command.
    #[must_use]
    pub const fn new(storage_dir: Option<PathBuf>) -> Self {
        Self { storage_dir }
    }

    /// Execute the simulate command.
    ///
    /// # Errors
    ///
    /// Returns an error if an input file is invalid, the session fails or
    /// output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &SimulateArgs,
    ) -> Result<(), CliError> {
        let ours = load_profile(&args.profile)?;
        let theirs = load_profile(&args.opponent_profile)?;
        let config = load_config(args.session.config.as_deref())?;
        let store = self.storage_dir.as_ref().map(OpponentStore::new);

        let matchup = Matchup {
            counterpart: args.opponent,
            rounds: args.session.rounds,
            seed: args.session.seed.unwrap_or_else(rand::random),
            opponent_first: args.opponent_first,
        };
        let report = play(ours, theirs, &config, store.as_ref(), matchup)?;
        format.write(writer, &report)
    }
}
