//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use parley_agent::CounterpartKind;

/// Parley - adaptive bilateral negotiation.
#[derive(Parser, Debug, Clone)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory of learned opponent models.
    ///
    /// Without it, nothing is remembered between sessions.
    #[arg(short, long, env = "PARLEY_STORAGE_DIR", global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Negotiate one session against a reference counterpart.
    Simulate(SimulateArgs),

    /// Negotiate against every counterpart over every profile pairing.
    Tournament(TournamentArgs),

    /// List stored opponent models, or show one.
    ShowModel(ShowModelArgs),
}

/// Options shared by the negotiating commands.
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Maximum number of rounds per session.
    #[arg(short, long, default_value_t = 100)]
    pub rounds: u32,

    /// Seed for reproducible sessions.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Strategy config JSON; missing fields keep their defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the simulate command.
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Our utility profile (JSON).
    #[arg(short, long)]
    pub profile: PathBuf,

    /// The counterpart's utility profile (JSON).
    #[arg(short = 'P', long)]
    pub opponent_profile: PathBuf,

    /// Counterpart tactic: boulware, linear, conceder, hardliner or random.
    #[arg(short, long, default_value = "boulware")]
    pub opponent: CounterpartKind,

    /// Let the counterpart move first.
    #[arg(long)]
    pub opponent_first: bool,

    /// Session options.
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the tournament command.
#[derive(Args, Debug, Clone)]
pub struct TournamentArgs {
    /// Utility profiles (JSON) over one shared domain; every ordered pair is played.
    #[arg(required = true, num_args = 2..)]
    pub profiles: Vec<PathBuf>,

    /// Counterpart tactics to include (comma-separated, default all).
    #[arg(long, value_delimiter = ',')]
    pub counterparts: Vec<CounterpartKind>,

    /// Session options.
    #[command(flatten)]
    pub session: SessionArgs,
}

/// Arguments for the show-model command.
#[derive(Args, Debug, Clone)]
pub struct ShowModelArgs {
    /// Opponent name, e.g. `boulware`. Lists stored names when omitted.
    pub name: Option<String>,
}
