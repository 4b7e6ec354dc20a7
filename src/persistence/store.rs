//! Key-value stores that hold game snapshots.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// A value held in a [`KeyValueStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    /// A boolean flag.
    Flag(bool),
    /// Per-cell codes.
    Cells(Vec<u8>),
    /// A textual identifier.
    Name(String),
}

impl StoredValue {
    /// Returns the flag, if this is one.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the cell codes, if this holds them.
    pub fn as_cells(&self) -> Option<&[u8]> {
        match self {
            Self::Cells(cells) => Some(cells),
            _ => None,
        }
    }

    /// Returns the name, if this is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Persistence error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Store error: {} at {}:{}", message, file, line)]
pub struct StoreError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StoreError {
    /// Creates a new store error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}

/// Host-provided storage that outlives the process.
///
/// Durability is the implementor's concern: anything `set` before an
/// interruption must be returned by `get` afterwards.
pub trait KeyValueStore {
    /// Reads a value.
    fn get(&self, key: &str) -> Option<StoredValue>;

    /// Writes a value.
    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<StoredValue> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-memory store. Survives nothing, which suits tests and hosts that
/// persist the map themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store backed by a JSON file holding the whole map.
///
/// Every `set` rewrites the file via a temporary sibling and a rename, so
/// a crash mid-write leaves the previous contents in place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, StoredValue>,
}

impl FileStore {
    /// Opens the store at `path`.
    ///
    /// A missing file yields an empty store. A file that cannot be parsed
    /// is logged and treated as empty; it is replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!(error = %e, "Snapshot file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot file yet");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(StoreError::new(format!(
                    "Failed to read '{}': {}",
                    path.display(),
                    e
                )));
            }
        };
        info!(keys = values.len(), "File store opened");
        Ok(Self { path, values })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling written before the rename: the full file name plus `.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn flush(&self) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(keys = self.values.len(), "Snapshot file written");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let previous = self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory in line with the file.
            match previous {
                Some(previous) => self.values.insert(key.to_string(), previous),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}

/// A store view whose keys live under `"{scope}."`.
#[derive(Debug, Clone)]
pub struct Scoped<S> {
    scope: String,
    inner: S,
}

impl<S: KeyValueStore> Scoped<S> {
    /// Wraps `inner`, prefixing every key with `scope`.
    pub fn new(scope: impl Into<String>, inner: S) -> Self {
        Self {
            scope: scope.into(),
            inner,
        }
    }

    /// The scope name.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Returns the wrapped store.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn key(&self, key: &str) -> String {
        format!("{}.{}", self.scope, key)
    }
}

impl<S: KeyValueStore> KeyValueStore for Scoped<S> {
    fn get(&self, key: &str) -> Option<StoredValue> {
        self.inner.get(&self.key(key))
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StoreError> {
        let key = self.key(key);
        self.inner.set(&key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let mut store = MemoryStore::new();
        store.set("a", StoredValue::Flag(true)).unwrap();
        store.set("a", StoredValue::Flag(false)).unwrap();
        assert_eq!(store.get("a"), Some(StoredValue::Flag(false)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_scoped_keys_do_not_collide() {
        let mut store = MemoryStore::new();
        Scoped::new("one", &mut store)
            .set("gameOver", StoredValue::Flag(true))
            .unwrap();
        Scoped::new("two", &mut store)
            .set("gameOver", StoredValue::Flag(false))
            .unwrap();
        assert_eq!(store.get("one.gameOver"), Some(StoredValue::Flag(true)));
        assert_eq!(store.get("two.gameOver"), Some(StoredValue::Flag(false)));
    }

    #[test]
    fn test_temp_path_keeps_full_file_name() {
        let json = FileStore {
            path: PathBuf::from("saves/state.json"),
            values: BTreeMap::new(),
        };
        let toml = FileStore {
            path: PathBuf::from("saves/state.toml"),
            values: BTreeMap::new(),
        };
        assert_eq!(json.temp_path(), PathBuf::from("saves/state.json.tmp"));
        assert_ne!(json.temp_path(), toml.temp_path());
    }

    #[test]
    fn test_untagged_values_round_trip_as_json() {
        let values = vec![
            StoredValue::Flag(true),
            StoredValue::Cells(vec![0, 1, 2]),
            StoredValue::Name("X".to_string()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[true,[0,1,2],"X"]"#);
        let back: Vec<StoredValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
