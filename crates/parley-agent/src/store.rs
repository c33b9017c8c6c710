//! Per-opponent persistence of learned models.
//!
//! One JSON file per counterpart, named after the counterpart's party
//! name, holding an [`OpponentSnapshot`]. Reads are best-effort: anything
//! that cannot be read means "no prior knowledge".

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_opponent::OpponentSnapshot;
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};

const EXTENSION: &str = "json";

/// Directory-backed store of opponent snapshots.
#[derive(Debug, Clone)]
pub struct OpponentStore {
    dir: PathBuf,
}

impl OpponentStore {
    /// Creates a store rooted at `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the snapshot of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidOpponentName`] for names that are empty
    /// or would escape the store directory.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.{EXTENSION}")))
    }

    /// Loads the snapshot of `name`, if one can be read.
    ///
    /// Missing, unreadable and malformed files are reported as `None`. Only
    /// unreadable and malformed files are warned about; a missing file is
    /// the normal first meeting.
    #[must_use]
    pub fn load(&self, name: &str) -> Option<OpponentSnapshot> {
        let path = match self.path_for(name) {
            Ok(path) => path,
            Err(e) => {
                warn!(opponent = %name, error = %e, "cannot load opponent model");
                return None;
            }
        };

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(opponent = %name, path = %path.display(), "no stored opponent model");
                return None;
            }
            Err(e) => {
                warn!(opponent = %name, path = %path.display(), error = %e, "failed to read opponent model");
                return None;
            }
        };

        match OpponentSnapshot::from_json(&json) {
            Ok(snapshot) => {
                debug!(opponent = %name, issues = snapshot.issue_weights.len(), "opponent model loaded");
                Some(snapshot)
            }
            Err(e) => {
                warn!(opponent = %name, path = %path.display(), error = %e, "malformed opponent model");
                None
            }
        }
    }

    /// Writes the snapshot of `name`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidOpponentName`] for unusable names and
    /// [`AgentError::Io`] if the directory or file cannot be written.
    pub fn save(&self, name: &str, snapshot: &OpponentSnapshot) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir).map_err(|e| AgentError::io(&self.dir, e))?;

        let json = snapshot.to_json()?;
        fs::write(&path, json).map_err(|e| AgentError::io(&path, e))?;

        info!(opponent = %name, path = %path.display(), "opponent model saved");
        Ok(path)
    }

    /// Names of every stored opponent, sorted.
    ///
    /// An absent directory is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Io`] if the directory exists but cannot be listed.
    pub fn names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AgentError::io(&self.dir, e)),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == EXTENSION))
            .filter_map(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let usable = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0']);
    if usable {
        Ok(())
    } else {
        Err(AgentError::InvalidOpponentName {
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io;
    use std::sync::{Arc, Mutex};

    use parley_opponent::IssueSnapshot;
    use test_case::test_case;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Log output at `WARN` and above emitted while `f` runs.
    fn warnings_during(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn snapshot() -> OpponentSnapshot {
        OpponentSnapshot {
            is_conceder: true,
            issue_weights: BTreeMap::from([(
                "price".into(),
                IssueSnapshot {
                    weight: 0.75,
                    value_counts: BTreeMap::from([("high".into(), 4), ("low".into(), 1)]),
                },
            )]),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path().join("nested"));

        let path = store.save("boulware", &snapshot()).unwrap();
        assert_eq!(path, dir.path().join("nested").join("boulware.json"));
        assert_eq!(store.load("boulware"), Some(snapshot()));
    }

    #[test]
    fn save_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());

        store.save("linear", &snapshot()).unwrap();
        store.save("linear", &OpponentSnapshot::default()).unwrap();
        assert_eq!(store.load("linear"), Some(OpponentSnapshot::default()));
    }

    #[test]
    fn missing_file_is_no_knowledge() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        assert_eq!(store.load("stranger"), None);
    }

    #[test]
    fn missing_file_is_quiet_but_malformed_file_warns() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        assert!(warnings_during(|| assert_eq!(store.load("stranger"), None)).is_empty());

        let logged = warnings_during(|| assert_eq!(store.load("broken"), None));
        assert!(logged.contains("malformed opponent model"), "{logged}");
    }

    #[test]
    fn malformed_file_is_no_knowledge() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert_eq!(store.load("broken"), None);
    }

    #[test]
    fn partial_file_loads_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        fs::write(dir.path().join("partial.json"), r#"{"is_conceder": true}"#).unwrap();

        let loaded = store.load("partial").unwrap();
        assert!(loaded.is_conceder);
        assert!(loaded.issue_weights.is_empty());
    }

    #[test_case("" ; "empty")]
    #[test_case(".." ; "parent")]
    #[test_case("../escape" ; "traversal")]
    #[test_case("a\\b" ; "backslash")]
    fn rejects_unusable_names(name: &str) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());

        assert!(matches!(
            store.save(name, &snapshot()),
            Err(AgentError::InvalidOpponentName { .. })
        ));
        assert_eq!(store.load(name), None);
    }

    #[test]
    fn save_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let store = OpponentStore::new(&blocker);

        assert!(matches!(
            store.save("boulware", &snapshot()),
            Err(AgentError::Io { .. })
        ));
    }

    #[test]
    fn names_lists_json_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path());
        assert!(store.names().unwrap().is_empty());

        store.save("linear", &snapshot()).unwrap();
        store.save("boulware", &snapshot()).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.names().unwrap(), vec!["boulware", "linear"]);
    }

    #[test]
    fn names_of_missing_dir_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = OpponentStore::new(dir.path().join("absent"));
        assert!(store.names().unwrap().is_empty());
    }
}
