//! Inspection of stored opponent models.

use std::io::Write;
use std::path::PathBuf;

use parley_agent::OpponentStore;

use crate::cli::ShowModelArgs;
use crate::error::CliError;
use crate::output::{ModelList, ModelView, OutputFormat};

/// Show-model command executor.
pub struct ShowModelCommand {
    storage_dir: Option<PathBuf>,
}

impl ShowModelCommand {
    /// Create a new show-model command.
    #[must_use]
    pub const fn new(storage_dir: Option<PathBuf>) -> Self {
        Self { storage_dir }
    }

    /// Execute the show-model command.
    ///
    /// # Errors
    ///
    /// Returns an error if no storage directory is configured, the named
    /// model does not exist or output fails.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &ShowModelArgs,
    ) -> Result<(), CliError> {
        let Some(dir) = &self.storage_dir else {
            return Err(CliError::InvalidArgument(
                "no storage directory; pass --storage-dir or set PARLEY_STORAGE_DIR".into(),
            ));
        };
        let store = OpponentStore::new(dir);

        match &args.name {
            Some(name) => {
                let snapshot = store
                    .load(name)
                    .ok_or_else(|| CliError::ModelNotFound(name.clone()))?;
                format.write(
                    writer,
                    &ModelView {
                        opponent: name.clone(),
                        snapshot,
                    },
                )
            }
            None => format.write(
                writer,
                &ModelList {
                    opponents: store.names()?,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use parley_opponent::OpponentSnapshot;

    use super::*;
    use crate::cli::Format;

    fn run(storage: Option<PathBuf>, name: Option<&str>, format: Format) -> Result<String, CliError> {
        let mut out = Vec::new();
        ShowModelCommand::new(storage).execute(
            &mut out,
            &OutputFormat::new(format),
            &ShowModelArgs {
                name: name.map(str::to_string),
            },
        )?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn requires_storage_dir() {
        assert!(matches!(
            run(None, None, Format::Table),
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[test]
    fn lists_stored_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        store.save("conceder", &OpponentSnapshot::default()).unwrap();

        let out = run(Some(dir.path().to_path_buf()), None, Format::Table).unwrap();
        assert!(out.contains("conceder"));
        assert!(out.contains("Total: 1 opponent(s)"));
    }

    #[test]
    fn shows_one_model_as_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        let snapshot = OpponentSnapshot {
            is_conceder: true,
            ..OpponentSnapshot::default()
        };
        store.save("conceder", &snapshot).unwrap();

        let out = run(Some(dir.path().to_path_buf()), Some("conceder"), Format::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["opponent"], "conceder");
        assert_eq!(json["is_conceder"], true);
    }

    #[test]
    fn unknown_model_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(matches!(
            run(Some(dir.path().to_path_buf()), Some("stranger"), Format::Table),
            Err(CliError::ModelNotFound(_))
        ));
    }
}
