//! # parley-cli
//!
//! Parley command-line interface.
//!
//! Provides commands for:
//! - Simulating one session against a reference counterpart
//! - Running a tournament over every counterpart and profile pairing
//! - Inspecting the opponent models learned across sessions
//!
//! Profiles and strategy configs are JSON files; learned opponent models
//! live in the directory given by `--storage-dir` or `PARLEY_STORAGE_DIR`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, ShowModelArgs, SimulateArgs, TournamentArgs};
pub use error::CliError;
pub use output::OutputFormat;
