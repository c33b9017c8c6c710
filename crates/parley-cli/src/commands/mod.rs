//! Command implementations.

pub mod show_model;
pub mod simulate;
pub mod tournament;

pub use show_model::ShowModelCommand;
pub use simulate::SimulateCommand;
pub use tournament::TournamentCommand;

use std::fs;
use std::path::Path;

use parley_agent::{CounterpartKind, Negotiator, OpponentStore, PartyId, SessionReport, run_session};
use parley_core::LinearAdditiveProfile;
use parley_strategy::{BiddingStrategy, StrategyConfig};

use crate::error::CliError;

/// Name under which our negotiator takes part.
pub const NEGOTIATOR_NAME: &str = "parley";

/// Loads and validates a profile file.
///
/// # Errors
///
/// Returns [`CliError::Read`] or [`CliError::Profile`].
pub fn load_profile(path: &Path) -> Result<LinearAdditiveProfile, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    LinearAdditiveProfile::from_json(&json).map_err(|source| CliError::Profile {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a strategy config file, or the defaults without one.
///
/// # Errors
///
/// Returns [`CliError::Read`] or [`CliError::Config`].
pub fn load_config(path: Option<&Path>) -> Result<StrategyConfig, CliError> {
    let Some(path) = path else {
        return Ok(StrategyConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    StrategyConfig::from_json(&json).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })
}

/// One pairing of our negotiator against a reference counterpart.
#[derive(Debug, Clone, Copy)]
pub struct Matchup {
    /// Counterpart tactic.
    pub counterpart: CounterpartKind,
    /// Round limit.
    pub rounds: u32,
    /// Seed of our strategy; the counterpart uses the next one.
    pub seed: u64,
    /// Whether the counterpart moves first.
    pub opponent_first: bool,
}

/// Plays one session and returns its report.
///
/// # Errors
///
/// Returns an error if a party cannot be built or the session fails.
pub fn play(
    ours: LinearAdditiveProfile,
    theirs: LinearAdditiveProfile,
    config: &StrategyConfig,
    store: Option<&OpponentStore>,
    matchup: Matchup,
) -> Result<SessionReport, CliError> {
    let strategy = BiddingStrategy::with_seed(ours, config.clone(), matchup.seed)?;
    let mut negotiator = Negotiator::new(PartyId::indexed(NEGOTIATOR_NAME, 1), strategy);
    if let Some(store) = store {
        negotiator = negotiator.with_store(store.clone());
    }
    let mut counterpart = matchup
        .counterpart
        .build(theirs, 2, matchup.seed.wrapping_add(1))?;

    let report = if matchup.opponent_first {
        run_session(counterpart.as_mut(), &mut negotiator, matchup.rounds)?
    } else {
        run_session(&mut negotiator, counterpart.as_mut(), matchup.rounds)?
    };
    Ok(report)
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Seller profile over a small two-issue domain.
    pub const SELLER: &str = r#"{
        "domain": {"price": ["low", "mid", "high"], "delivery": ["slow", "fast"]},
        "issue_weights": {"price": 0.8, "delivery": 0.2},
        "value_utilities": {
            "price": {"low": 0.0, "mid": 0.6, "high": 1.0},
            "delivery": {"slow": 1.0, "fast": 0.0}
        }
    }"#;

    /// Buyer profile, opposed to [`SELLER`] on price.
    pub const BUYER: &str = r#"{
        "domain": {"price": ["low", "mid", "high"], "delivery": ["slow", "fast"]},
        "issue_weights": {"price": 0.6, "delivery": 0.4},
        "value_utilities": {
            "price": {"low": 1.0, "mid": 0.6, "high": 0.0},
            "delivery": {"slow": 0.0, "fast": 1.0}
        }
    }"#;
}
