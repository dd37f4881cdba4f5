//! Durable fluency storage.
//!
//! Performance data lives in a single key-value slot holding the JSON form of
//! [`PerformanceData`]:
//!
//! ```json
//! { "2x7": { "correct": 3, "incorrect": 1, "totalAttempts": 4,
//!            "responseTimes": [1800, 2400, 5200, 1300], "fluency": 0.41 } }
//! ```
//!
//! Storage failures never reach the practice loop. A missing or unreadable
//! slot loads as an empty mapping, and a failed write leaves the in-memory
//! data as it was; both are logged with `tracing::warn!`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::practice_engine::fluency::apply_attempt;
use crate::practice_engine::models::{Fact, PerformanceData, SessionAttempt};

/// Name of the slot holding serialized performance data.
pub const STORAGE_KEY: &str = "timesTablePerformance";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A single durable string slot.
pub trait KeyValueStore {
    /// Current slot contents, `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the slot.
    fn save(&mut self, value: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Keeps the slot in a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{dir}/timesTablePerformance.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn save(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, value)?;
        Ok(())
    }
}

/// In-process slot, used by tests and demos.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` already in the slot.
    pub fn with_contents(value: impl Into<String>) -> Self {
        Self { slot: Some(value.into()) }
    }

    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.clone())
    }

    fn save(&mut self, value: &str) -> Result<()> {
        self.slot = Some(value.to_string());
        Ok(())
    }
}

/// Normalize every record and move it under its fact's canonical key.
///
/// Data written by older versions may use the operands in either order
/// (`"10x2"`); records that land on the same key are merged. Keys that do not
/// name a fact are kept as they are.
fn canonicalize(raw: PerformanceData) -> PerformanceData {
    let mut data = PerformanceData::new();
    for (key, record) in raw {
        let record = record.normalized();
        let key = match Fact::from_key(&key) {
            Some(fact) => fact.key(),
            None => {
                warn!(key = %key, "stored record has an unrecognised key");
                key
            }
        };
        let merged = match data.remove(&key) {
            Some(existing) => existing.merge(record),
            None => record,
        };
        data.insert(key, merged);
    }
    data
}

// ---------------------------------------------------------------------------
// FluencyStore
// ---------------------------------------------------------------------------

/// Owns the authoritative [`PerformanceData`] and its backing slot.
pub struct FluencyStore<S: KeyValueStore> {
    backend: S,
    data: PerformanceData,
}

impl<S: KeyValueStore> FluencyStore<S> {
    /// Wrap `backend` and load whatever it holds.
    pub fn open(backend: S) -> Self {
        let mut store = Self { backend, data: PerformanceData::new() };
        store.data = store.load();
        store
    }

    /// Read and decode the slot. Never fails: absent or malformed content
    /// yields an empty mapping.
    pub fn load(&self) -> PerformanceData {
        let raw = match self.backend.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no stored performance data, starting fresh");
                return PerformanceData::new();
            }
            Err(e) => {
                warn!("could not load performance data: {e}");
                return PerformanceData::new();
            }
        };

        match serde_json::from_str::<PerformanceData>(&raw) {
            Ok(data) => canonicalize(data),
            Err(e) => {
                warn!("stored performance data is malformed, ignoring it: {e}");
                PerformanceData::new()
            }
        }
    }

    /// Serialize and write `data`. Failures are logged and swallowed.
    pub fn persist(&mut self, data: &PerformanceData) {
        if let Err(e) = self.try_persist(data) {
            warn!("could not save performance data: {e}");
        }
    }

    fn try_persist(&mut self, data: &PerformanceData) -> Result<()> {
        let json = serde_json::to_string(data)?;
        self.backend.save(&json)
    }

    /// Apply one attempt, keep the result, and persist it.
    pub fn record(&mut self, attempt: &SessionAttempt) -> &PerformanceData {
        let next = apply_attempt(&self.data, attempt);
        self.persist(&next);
        self.data = next;
        &self.data
    }

    /// Forget all progress.
    pub fn reset(&mut self) {
        self.data = PerformanceData::new();
        let empty = PerformanceData::new();
        self.persist(&empty);
    }

    pub fn data(&self) -> &PerformanceData {
        &self.data
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }
}
