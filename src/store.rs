//! Persistent record store
//!
//! A flat key-value store whose values are JSON documents. Three keys are
//! in use:
//!
//! ```text
//! user          # {name, email} of the signed-in user
//! tasks         # [Task, ...]
//! teamMembers   # [TeamMember, ...]
//! ```
//!
//! [`DirStore`] keeps one `<key>.json` file per key under a root
//! directory, next to a `<key>.json.lock` file used to serialize
//! read-modify-write cycles between processes. [`MemoryStore`] keeps the
//! same documents in a map and stands in for the directory store in tests.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

pub const USER_KEY: &str = "user";
pub const TASKS_KEY: &str = "tasks";
pub const TEAM_MEMBERS_KEY: &str = "teamMembers";

/// Backing store for JSON documents addressed by key.
pub trait KeyValueStore: fmt::Debug + Send + Sync {
    /// Raw document for `key`, or `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the document for `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Drop `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Exclusive guard for a read-modify-write of `key`.
    ///
    /// Stores without cross-process sharing return `None`.
    fn lock(&self, _key: &str) -> Result<Option<FileLock>> {
        Ok(None)
    }
}

/// Store handle shared by every repository in a process
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Read and parse the document under `key`.
///
/// An absent key is `Ok(None)`. A document that does not parse as `T`
/// is reported as [`Error::CorruptState`] rather than coerced.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        tracing::debug!(key, "store key absent");
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(key, error = %err, "stored document failed to parse");
            Err(Error::CorruptState {
                key: key.to_string(),
                message: err.to_string(),
            })
        }
    }
}

/// Serialize `value` and write it under `key`
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    store.set(key, &json)?;
    tracing::debug!(key, bytes = json.len(), "store key written");
    Ok(())
}

/// Read a collection; an absent key is an empty collection
pub fn read_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<T>> {
    Ok(read_json(store, key)?.unwrap_or_default())
}

/// Lock `key`, load its collection, let `f` change it, write it back.
///
/// The whole collection is rewritten on every call.
pub fn update_collection<T, R, F>(store: &dyn KeyValueStore, key: &str, f: F) -> Result<R>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Result<R>,
{
    let _lock = store.lock(key)?;
    let mut records: Vec<T> = read_collection(store, key)?;
    let result = f(&mut records)?;
    write_json(store, key, &records)?;
    Ok(result)
}

fn validate_key(key: &str) -> Result<()> {
    if key.is_empty()
        || !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(Error::InvalidArgument(format!("invalid store key '{key}'")));
    }
    Ok(())
}

// =============================================================================
// Directory-backed store
// =============================================================================

/// One JSON file per key under `root`
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    lock_timeout_ms: u64,
}

impl DirStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened directory store");
        Ok(Self {
            root,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        })
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document file for `key`
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }

    fn lock_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json.lock")))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        lock::write_atomic(&path, value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn lock(&self, key: &str) -> Result<Option<FileLock>> {
        let path = self.lock_path(key)?;
        FileLock::acquire(path, self.lock_timeout_ms).map(Some)
    }
}

// =============================================================================
// In-memory store
// =============================================================================

/// Map-backed store, nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries().remove(key);
        Ok(())
    }
}
