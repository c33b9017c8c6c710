//! Round-robin tournament against the reference counterparts.
//!
//! Every selected counterpart is played on every ordered pair of distinct
//! profiles, our negotiator moving first. With a storage directory the
//! negotiator keeps learning about each counterpart from one session to
//! the next.

use std::io::Write;
use std::path::{Path, PathBuf};

use parley_agent::{CounterpartKind, OpponentStore};
use parley_core::{LinearAdditiveProfile, UtilitySpace};
use tracing::info;

use super::{Matchup, load_config, load_profile, play};
use crate::cli::TournamentArgs;
use crate::error::CliError;
use crate::output::{OutputFormat, TournamentResults, TournamentRow};

/// Tournament command executor.
pub struct TournamentCommand {
    storage_dir: Option<PathBuf>,
}

impl TournamentCommand {
    /// Create a new tournament command.
    #[must_use]
    pub const fn new(storage_dir: Option<PathBuf>) -> Self {
        Self { storage_dir }
    }

    /// Execute the tournament command.
    ///
    /// # Errors
    ///
    /// Returns an error if a profile is invalid, the profiles do not share
    /// one domain, a session fails or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &TournamentArgs,
    ) -> Result<(), CliError> {
        let results = self.run(args)?;
        format.write(writer, &results)
    }

    /// Plays every session and collects the results.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn run(&self, args: &TournamentArgs) -> Result<TournamentResults, CliError> {
        let profiles = args
            .profiles
            .iter()
            .map(|path| Ok((profile_name(path), load_profile(path)?)))
            .collect::<Result<Vec<_>, CliError>>()?;
        check_shared_domain(&profiles)?;

        let config = load_config(args.session.config.as_deref())?;
        let store = self.storage_dir.as_ref().map(OpponentStore::new);
        let counterparts = if args.counterparts.is_empty() {
            CounterpartKind::ALL.to_vec()
        } else {
            args.counterparts.clone()
        };
        let base_seed = args.session.seed.unwrap_or_else(rand::random);

        let mut rows = Vec::new();
        for counterpart in counterparts {
            for (i, (ours_name, ours)) in profiles.iter().enumerate() {
                for (j, (theirs_name, theirs)) in profiles.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let matchup = Matchup {
                        counterpart,
                        rounds: args.session.rounds,
                        seed: base_seed.wrapping_add(2 * rows.len() as u64),
                        opponent_first: false,
                    };
                    let report = play(ours.clone(), theirs.clone(), &config, store.as_ref(), matchup)?;
                    rows.push(TournamentRow {
                        counterpart,
                        profile: ours_name.clone(),
                        opponent_profile: theirs_name.clone(),
                        agreement: report.is_agreement(),
                        utility: report.first_utility,
                        opponent_utility: report.second_utility,
                        rounds: report.rounds,
                    });
                }
            }
        }

        info!(sessions = rows.len(), "tournament finished");
        Ok(TournamentResults::new(rows))
    }
}

fn profile_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
}

fn check_shared_domain(profiles: &[(String, LinearAdditiveProfile)]) -> Result<(), CliError> {
    let Some(((first_name, first), rest)) = profiles.split_first() else {
        return Ok(());
    };
    for (name, profile) in rest {
        if profile.domain() != first.domain() {
            return Err(CliError::InvalidArgument(format!(
                "profiles {first_name} and {name} are over different domains"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::cli::SessionArgs;
    use crate::commands::fixtures;

    fn args(dir: &Path, counterparts: Vec<CounterpartKind>) -> TournamentArgs {
        fs::write(dir.join("seller.json"), fixtures::SELLER).unwrap();
        fs::write(dir.join("buyer.json"), fixtures::BUYER).unwrap();
        TournamentArgs {
            profiles: vec![dir.join("seller.json"), dir.join("buyer.json")],
            counterparts,
            session: SessionArgs {
                rounds: 30,
                seed: Some(5),
                config: None,
            },
        }
    }

    #[test]
    fn plays_every_counterpart_on_every_ordered_pair() {
        let dir = tempfile::tempdir().expect("tempdir");
        let results = TournamentCommand::new(None).run(&args(dir.path(), vec![])).unwrap();

        assert_eq!(results.sessions.len(), CounterpartKind::ALL.len() * 2);
        assert_eq!(results.summary.len(), CounterpartKind::ALL.len());
        assert!(results.sessions.iter().all(|row| row.rounds <= 30));
        assert_eq!(results.sessions[0].profile, "seller");
        assert_eq!(results.sessions[0].opponent_profile, "buyer");
    }

    #[test]
    fn selected_counterparts_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let results = TournamentCommand::new(None)
            .run(&args(dir.path(), vec![CounterpartKind::Hardliner]))
            .unwrap();

        assert_eq!(results.sessions.len(), 2);
        assert!(results
            .sessions
            .iter()
            .all(|row| row.counterpart == CounterpartKind::Hardliner));
    }

    #[test]
    fn learns_across_sessions_with_storage() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = dir.path().join("models");
        TournamentCommand::new(Some(storage.clone()))
            .run(&args(dir.path(), vec![CounterpartKind::Boulware, CounterpartKind::Random]))
            .unwrap();

        let store = OpponentStore::new(storage);
        assert_eq!(store.names().unwrap(), vec!["boulware", "random"]);
    }

    #[test]
    fn rejects_profiles_over_different_domains() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut args = args(dir.path(), vec![]);
        let other = dir.path().join("other.json");
        fs::write(
            &other,
            r#"{
                "domain": {"colour": ["red", "blue"]},
                "issue_weights": {"colour": 1.0},
                "value_utilities": {"colour": {"red": 1.0, "blue": 0.0}}
            }"#,
        )
        .unwrap();
        args.profiles.push(other);

        assert!(matches!(
            TournamentCommand::new(None).run(&args),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
