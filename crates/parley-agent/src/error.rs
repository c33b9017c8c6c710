//! Error types for parley-agent.

use std::path::PathBuf;

use parley_core::CoreError;
use parley_opponent::OpponentError;
use parley_strategy::StrategyError;
use thiserror::Error;

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors that can occur while running parties and sessions.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Opponent name cannot be used as a store key.
    #[error("invalid opponent name: {name:?}")]
    InvalidOpponentName {
        /// The rejected name.
        name: String,
    },

    /// Filesystem access failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A party broke the alternating-offers protocol.
    #[error("protocol violation by {party}: {reason}")]
    Protocol {
        /// The offending party.
        party: String,
        /// What went wrong.
        reason: String,
    },

    /// No reference counterpart has this name.
    #[error("unknown counterpart {name:?}, expected one of boulware, linear, conceder, hardliner, random")]
    UnknownCounterpart {
        /// The requested name.
        name: String,
    },

    /// Session parameters are unusable.
    #[error("invalid session: {0}")]
    InvalidSession(String),

    /// Domain or profile error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Opponent model rejected an update.
    #[error(transparent)]
    Opponent(#[from] OpponentError),

    /// Bidding strategy failed.
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

impl AgentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn protocol(party: impl ToString, reason: impl Into<String>) -> Self {
        Self::Protocol {
            party: party.to_string(),
            reason: reason.into(),
        }
    }
}
