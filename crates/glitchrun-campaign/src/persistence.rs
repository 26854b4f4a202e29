//! Meta progress persistence over a string key-value store.
//!
//! Loading never fails: a missing or unreadable record yields a fresh
//! profile. Saving failures are logged and swallowed so a broken disk can't
//! interrupt a run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use glitchrun_core::meta::MetaProgress;
use thiserror::Error;

/// Storage key for the meta record.
pub const META_KEY: &str = "glitchrun.meta.v1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode meta progress: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StoreError::Io { path, source })
    }
}

/// Loads and saves the meta record.
#[derive(Debug)]
pub struct MetaStore<S> {
    store: S,
}

impl<S: KeyValueStore> MetaStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Read the stored record. Missing fields take defaults, and the unlocked
    /// set always includes the current default unlocks.
    pub fn load(&self) -> MetaProgress {
        let json = match self.store.get(META_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => {
                tracing::debug!("no meta record stored, starting fresh");
                return MetaProgress::default();
            }
            Err(e) => {
                tracing::warn!(error = %e, "meta record unreadable, starting fresh");
                return MetaProgress::default();
            }
        };
        match serde_json::from_str::<MetaProgress>(&json) {
            Ok(mut meta) => {
                meta.merge_default_unlocks();
                meta
            }
            Err(e) => {
                tracing::warn!(error = %e, "meta record malformed, starting fresh");
                MetaProgress::default()
            }
        }
    }

    /// Write the record, reporting failures.
    pub fn try_save(&mut self, meta: &MetaProgress) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(meta)?;
        self.store.set(META_KEY, &json)
    }

    /// Write the record. Failures are logged and otherwise ignored.
    pub fn save(&mut self, meta: &MetaProgress) {
        if let Err(e) = self.try_save(meta) {
            tracing::warn!(error = %e, "failed to save meta progress");
        }
    }
}
