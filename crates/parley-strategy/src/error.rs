//! Error types for parley-strategy.

use parley_core::CoreError;
use thiserror::Error;

/// Result type for strategy operations.
pub type Result<T> = std::result::Result<T, StrategyError>;

/// Errors that can occur while deciding on an action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    /// The strategy configuration is unusable.
    #[error("invalid strategy config: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// The outcome space could not be enumerated.
    #[error("bid space unavailable: {0}")]
    BidSpace(#[source] CoreError),

    /// The self-utility evaluator failed.
    #[error("self-utility evaluation failed: {0}")]
    Utility(#[source] CoreError),
}
