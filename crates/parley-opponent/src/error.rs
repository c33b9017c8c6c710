//! Error types for parley-opponent.

use parley_core::CoreError;
use thiserror::Error;

/// Result type for opponent-model operations.
pub type Result<T> = std::result::Result<T, OpponentError>;

/// Errors that can occur while updating an opponent model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpponentError {
    /// The observed bid is not a complete bid of the model's domain.
    #[error("invalid bid: {0}")]
    InvalidBid(#[source] CoreError),

    /// The self-utility evaluator failed.
    #[error("self-utility evaluation failed: {0}")]
    Utility(#[source] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_invalid_bid() {
        let err = OpponentError::InvalidBid(CoreError::MissingIssue {
            issue: "price".into(),
        });
        assert_eq!(
            err.to_string(),
            "invalid bid: bid is missing a value for issue 'price'"
        );
    }

    #[test]
    fn error_exposes_source() {
        use std::error::Error as _;
        let err = OpponentError::Utility(CoreError::EmptyDomain);
        assert!(err.source().is_some());
    }
}
