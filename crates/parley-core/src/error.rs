//! Error types for parley-core.

use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building domains, enumerating bids or evaluating utility.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The domain has no issues.
    #[error("domain has no issues")]
    EmptyDomain,

    /// An issue was declared without any values.
    #[error("issue '{issue}' has no values")]
    EmptyIssue {
        /// The offending issue.
        issue: String,
    },

    /// An issue lists the same value twice.
    #[error("issue '{issue}' lists value '{value}' more than once")]
    DuplicateValue {
        /// The issue containing the duplicate.
        issue: String,
        /// The duplicated value.
        value: String,
    },

    /// A bid does not assign a value to a domain issue.
    #[error("bid is missing a value for issue '{issue}'")]
    MissingIssue {
        /// The unassigned issue.
        issue: String,
    },

    /// A bid or profile refers to an issue outside the domain.
    #[error("unknown issue '{issue}'")]
    UnknownIssue {
        /// The unknown issue.
        issue: String,
    },

    /// A bid or profile refers to a value outside the issue's value set.
    #[error("unknown value '{value}' for issue '{issue}'")]
    UnknownValue {
        /// The issue the value was given for.
        issue: String,
        /// The unknown value.
        value: String,
    },

    /// The number of complete bids does not fit the enumerator.
    #[error("bid space is too large to enumerate")]
    BidSpaceTooLarge,

    /// A bid ordinal lies outside the bid space.
    #[error("bid ordinal {ordinal} out of range for bid space of size {size}")]
    OrdinalOutOfRange {
        /// Requested ordinal.
        ordinal: u128,
        /// Size of the bid space.
        size: u128,
    },

    /// A utility profile failed validation.
    #[error("invalid profile: {reason}")]
    InvalidProfile {
        /// Why the profile was rejected.
        reason: String,
    },

    /// Profile or domain JSON could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
