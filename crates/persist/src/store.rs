//! File-backed savegame store.
//!
//! Layout inside the store directory:
//! ```text
//! savegames.json     - schema version and one record per level
//! savegames.sha256   - hex SHA-256 of savegames.json
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plumbfield_session::{Outcome, ResultStore, ResultStoreError};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Savegame, SavegameStatus};

const SAVEGAME_SCHEMA_VERSION: u32 = 1;
const SAVEGAME_FILE: &str = "savegames.json";
const DIGEST_FILE: &str = "savegames.sha256";

#[derive(Debug, thiserror::Error)]
pub enum SavegameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },
    #[error("schema version mismatch: file has v{file_version}, expected v{expected_version}")]
    SchemaMismatch {
        file_version: u32,
        expected_version: u32,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavegameFile {
    schema_version: u32,
    savegames: BTreeMap<String, Savegame>,
}

/// Best result per level, written through to disk on every change.
#[derive(Debug)]
pub struct SavegameStore {
    root: PathBuf,
    savegames: BTreeMap<String, Savegame>,
}

impl SavegameStore {
    /// Open or create a store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SavegameError> {
        let root = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;

        let file_path = root.join(SAVEGAME_FILE);
        let savegames = if file_path.exists() {
            let data = std::fs::read(&file_path)?;
            verify_digest(&root, &data)?;
            let file: SavegameFile = serde_json::from_slice(&data)?;
            if file.schema_version != SAVEGAME_SCHEMA_VERSION {
                return Err(SavegameError::SchemaMismatch {
                    file_version: file.schema_version,
                    expected_version: SAVEGAME_SCHEMA_VERSION,
                });
            }
            file.savegames
        } else {
            BTreeMap::new()
        };
        tracing::debug!(root = %root.display(), levels = savegames.len(), "savegames loaded");

        Ok(Self { root, savegames })
    }

    /// Directory holding the savegame files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stored record for a level, if any.
    pub fn get(&self, level_id: &str) -> Option<&Savegame> {
        self.savegames.get(level_id)
    }

    /// All records, ordered by level id.
    pub fn savegames(&self) -> impl Iterator<Item = &Savegame> {
        self.savegames.values()
    }

    /// Number of levels with a record.
    pub fn len(&self) -> usize {
        self.savegames.len()
    }

    /// Returns true if no level has a record.
    pub fn is_empty(&self) -> bool {
        self.savegames.is_empty()
    }

    /// Keep `savegame` if it beats the stored record for its level.
    /// Returns whether the store changed.
    pub fn record(&mut self, savegame: Savegame) -> Result<bool, SavegameError> {
        if let Some(existing) = self.savegames.get(&savegame.level_id) {
            if !savegame.is_better_than(existing) {
                tracing::debug!(level = %savegame.level_id, "kept existing savegame");
                return Ok(false);
            }
        }
        tracing::info!(
            level = %savegame.level_id,
            status = ?savegame.status,
            saved = savegame.saved,
            "savegame updated"
        );
        let mut next = self.savegames.clone();
        next.insert(savegame.level_id.clone(), savegame);
        self.write(&next)?;
        self.savegames = next;
        Ok(true)
    }

    /// Make a level playable without touching an existing record.
    pub fn unlock(&mut self, level_id: &str) -> Result<bool, SavegameError> {
        if self.savegames.contains_key(level_id) {
            return Ok(false);
        }
        self.record(Savegame::accessible(level_id))
    }

    /// Returns true if the level has been solved at least once.
    pub fn is_finished(&self, level_id: &str) -> bool {
        self.get(level_id)
            .is_some_and(|s| s.status == SavegameStatus::Finished)
    }

    /// Re-check the files on disk against their digest.
    pub fn verify_integrity(&self) -> Result<(), SavegameError> {
        let data = std::fs::read(self.root.join(SAVEGAME_FILE))?;
        verify_digest(&self.root, &data)
    }

    /// Write `savegames` and its digest. Callers commit to memory only after
    /// this succeeds.
    fn write(&self, savegames: &BTreeMap<String, Savegame>) -> Result<(), SavegameError> {
        let file = SavegameFile {
            schema_version: SAVEGAME_SCHEMA_VERSION,
            savegames: savegames.clone(),
        };
        let data = serde_json::to_vec_pretty(&file)?;
        std::fs::write(self.root.join(SAVEGAME_FILE), &data)?;
        std::fs::write(self.root.join(DIGEST_FILE), sha256_hex(&data))?;
        Ok(())
    }
}

impl ResultStore for SavegameStore {
    fn persist(&mut self, outcome: &Outcome) -> Result<(), ResultStoreError> {
        self.record(Savegame::from_outcome(outcome))
            .map(|_| ())
            .map_err(|err| ResultStoreError::new(outcome.level_id.clone(), err))
    }
}

fn verify_digest(root: &Path, data: &[u8]) -> Result<(), SavegameError> {
    let expected = std::fs::read_to_string(root.join(DIGEST_FILE))?;
    let expected = expected.trim();
    let actual = sha256_hex(data);
    if expected != actual {
        return Err(SavegameError::IntegrityMismatch {
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(level: &str, saved: u32, time_used: u64) -> Outcome {
        Outcome {
            level_id: level.into(),
            saved,
            killed: 10 - saved,
            total: 10,
            required: 5,
            time_limit: Some(3000),
            time_used,
        }
    }

    #[test]
    fn open_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SavegameStore::open(tmp.path().join("progress")).unwrap();
        assert!(store.is_empty());
        assert!(store.root().is_dir());
    }

    #[test]
    fn records_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("progress");
        let mut store = SavegameStore::open(&dir).unwrap();
        store.persist(&outcome("one", 6, 1200)).unwrap();
        store.unlock("two").unwrap();

        let reopened = SavegameStore::open(&dir).unwrap();
        assert_eq!(reopened.len(), 2);
        assert!(reopened.is_finished("one"));
        assert_eq!(reopened.get("one").unwrap().time_used, 1200);
        assert_eq!(
            reopened.get("two").unwrap().status,
            SavegameStatus::Accessible
        );
        reopened.verify_integrity().unwrap();
    }

    #[test]
    fn finished_level_is_never_downgraded() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SavegameStore::open(tmp.path()).unwrap();
        assert!(store.record(Savegame::from_outcome(&outcome("lvl", 6, 1000))).unwrap());
        assert!(!store.record(Savegame::from_outcome(&outcome("lvl", 2, 100))).unwrap());
        assert!(!store.unlock("lvl").unwrap());
        assert!(store.is_finished("lvl"));

        assert!(store.record(Savegame::from_outcome(&outcome("lvl", 6, 800))).unwrap());
        assert_eq!(store.get("lvl").unwrap().time_used, 800);
    }

    #[test]
    fn tampered_file_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SavegameStore::open(tmp.path()).unwrap();
        store.persist(&outcome("lvl", 3, 500)).unwrap();

        let path = tmp.path().join(SAVEGAME_FILE);
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, text.replace("\"saved\": 3", "\"saved\": 9")).unwrap();

        assert!(matches!(
            store.verify_integrity(),
            Err(SavegameError::IntegrityMismatch { .. })
        ));
        assert!(matches!(
            SavegameStore::open(tmp.path()),
            Err(SavegameError::IntegrityMismatch { .. })
        ));
    }

    #[test]
    fn future_schema_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let data = br#"{"schema_version": 99, "savegames": {}}"#;
        std::fs::write(tmp.path().join(SAVEGAME_FILE), data).unwrap();
        std::fs::write(tmp.path().join(DIGEST_FILE), sha256_hex(data)).unwrap();
        assert!(matches!(
            SavegameStore::open(tmp.path()),
            Err(SavegameError::SchemaMismatch {
                file_version: 99,
                ..
            })
        ));
    }

    #[test]
    fn store_errors_become_result_store_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = SavegameStore::open(tmp.path().join("gone")).unwrap();
        std::fs::remove_dir_all(tmp.path().join("gone")).unwrap();
        let err = store.persist(&outcome("lvl", 6, 10)).unwrap_err();
        assert_eq!(err.level, "lvl");
    }

    #[test]
    fn failed_write_is_retried_on_next_record() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("progress");
        let mut store = SavegameStore::open(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(store.persist(&outcome("lvl", 6, 10)).is_err());
        assert!(store.get("lvl").is_none());

        std::fs::create_dir_all(&dir).unwrap();
        store.persist(&outcome("lvl", 6, 10)).unwrap();

        let reopened = SavegameStore::open(&dir).unwrap();
        assert_eq!(reopened.len(), 1);
        assert!(reopened.is_finished("lvl"));
        reopened.verify_integrity().unwrap();
    }
}
