//! Durable storage for [`ClockState`].
//!
//! A store holds exactly one JSON record under one fixed key. Loading is
//! forgiving: a missing or unreadable record means "nothing stored" and the
//! clock starts from defaults. Saving is fire-and-forget: a failed write is
//! logged and otherwise ignored.
//!
//! Two stores are provided:
//!
//! - [`FileStore`] writes `<dir>/<key>.json`, creating the directory on
//!   first save. Each save goes through `<key>.json.tmp` and a rename.
//! - [`MemoryStore`] keeps raw records in a map shared between clones, which
//!   is handy for tests and for hosts that must not touch the disk.
//!
//! ```rust
//! use bubbletea_clock::store::{MemoryStore, StateStore};
//! use bubbletea_clock::state::ClockState;
//!
//! let store = MemoryStore::new("clock-state");
//! assert!(store.load().is_empty());
//!
//! let state = ClockState { seconds: 12, ..ClockState::default() };
//! store.save(&state);
//! assert_eq!(store.load().merge_over(ClockState::default()), state);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::Config;
use crate::error::StoreError;
use crate::state::{ClockState, StoredState};

/// Key-value persistence for the clock's single state record.
pub trait StateStore: Send + Sync + fmt::Debug {
    /// Reads the stored record.
    ///
    /// Returns an empty [`StoredState`] when nothing is stored or the record
    /// cannot be parsed.
    fn load(&self) -> StoredState;

    /// Overwrites the stored record with `state`.
    fn save(&self, state: &ClockState);
}

/// Parses a raw record. `null` and blank input count as "nothing stored".
pub fn parse_record(raw: &str) -> Result<StoredState, StoreError> {
    if raw.trim().is_empty() {
        return Ok(StoredState::default());
    }
    let record: Option<StoredState> = serde_json::from_str(raw)?;
    Ok(record.unwrap_or_default())
}

/// Serializes `state` as a full record.
pub fn encode_record(state: &ClockState) -> Result<String, StoreError> {
    Ok(serde_json::to_string(state)?)
}

/// Stores the record as a JSON file named after the key.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store for `<dir>/<key>.json`.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    /// Creates a store from the configured directory and key.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.state_dir, &config.local_state_key)
    }

    /// Location of the record on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record, surfacing I/O and parse failures.
    pub fn try_load(&self) -> Result<StoredState, StoreError> {
        if !self.path.exists() {
            return Ok(StoredState::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_record(&raw)
    }

    /// Scratch file the record is written to before it replaces [`FileStore::path`].
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Writes the record, creating parent directories as needed.
    ///
    /// The record goes to [`FileStore::temp_path`] first and is renamed over
    /// the real file, so an interrupted save leaves the previous record intact.
    pub fn try_save(&self, state: &ClockState) -> Result<(), StoreError> {
        let raw = encode_record(state)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let tmp_path = self.temp_path();
        let write_tmp = || -> std::io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(raw.as_bytes())?;
            file.sync_all()
        };
        write_tmp().map_err(|source| StoreError::Write {
            path: tmp_path.clone(),
            source,
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::trace!(path = %self.path.display(), "saved clock state");
        Ok(())
    }
}

impl StateStore for FileStore {
    fn load(&self) -> StoredState {
        match self.try_load() {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring stored clock state");
                StoredState::default()
            }
        }
    }

    fn save(&self, state: &ClockState) {
        if let Err(err) = self.try_save(state) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to save clock state");
        }
    }
}

/// In-memory store. Clones share the same records, like tabs sharing one
/// storage scope.
#[derive(Clone, Default)]
pub struct MemoryStore {
    key: String,
    records: Arc<Mutex<HashMap<String, String>>>,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore").field("key", &self.key).finish()
    }
}

impl MemoryStore {
    /// Creates an empty store that reads and writes under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            records: Arc::default(),
        }
    }

    /// Returns a store sharing this one's records but using another key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            records: Arc::clone(&self.records),
        }
    }

    /// The raw record under this store's key.
    pub fn raw(&self) -> Option<String> {
        self.records().get(&self.key).cloned()
    }

    /// Replaces the raw record under this store's key.
    pub fn set_raw(&self, raw: impl Into<String>) {
        self.records().insert(self.key.clone(), raw.into());
    }

    /// Removes the record under this store's key.
    pub fn clear(&self) {
        self.records().remove(&self.key);
    }

    fn records(&self) -> MutexGuard<'_, HashMap<String, String>> {
        match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> StoredState {
        let Some(raw) = self.raw() else {
            return StoredState::default();
        };
        match parse_record(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "ignoring stored clock state");
                StoredState::default()
            }
        }
    }

    fn save(&self, state: &ClockState) {
        match encode_record(state) {
            Ok(raw) => self.set_raw(raw),
            Err(err) => tracing::warn!(key = %self.key, error = %err, "failed to save clock state"),
        }
    }
}
