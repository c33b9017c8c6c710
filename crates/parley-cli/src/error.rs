//! CLI error types.

use std::path::PathBuf;

use parley_agent::AgentError;
use parley_core::CoreError;
use parley_strategy::StrategyError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A profile file is not a valid profile.
    #[error("invalid profile {}: {source}", path.display())]
    Profile {
        /// The file.
        path: PathBuf,
        /// Why it was rejected.
        #[source]
        source: CoreError,
    },

    /// A strategy config file is not a valid config.
    #[error("invalid strategy config {}: {source}", path.display())]
    Config {
        /// The file.
        path: PathBuf,
        /// Why it was rejected.
        #[source]
        source: StrategyError,
    },

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No model is stored under this opponent name.
    #[error("no stored model for opponent {0:?}")]
    ModelNotFound(String),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// Party or session failure.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Strategy construction failure.
    #[error(transparent)]
    Strategy(#[from] StrategyError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_error_display_read() {
        let err = CliError::Read {
            path: "profiles/a.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        assert_eq!(err.to_string(), "cannot read profiles/a.json: file not found");
    }

    #[test]
    fn cli_error_display_model_not_found() {
        let err = CliError::ModelNotFound("boulware".into());
        assert_eq!(err.to_string(), "no stored model for opponent \"boulware\"");
    }

    #[test]
    fn cli_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err = CliError::from(io_err);
        assert!(matches!(cli_err, CliError::Io(_)));
    }
}
