// ── File-backed key-value store ──
//
// A flat TOML table of strings, read once on open and rewritten whole on
// every change. Writes go to a sibling temp file and are renamed into
// place so a crash never leaves a half-written state file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use seazen_core::{CoreError, KeyValueStore};

use crate::ConfigError;

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(crate::state_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, CoreError> {
        self.entries.lock().map_err(|_| CoreError::Store {
            message: "state lock poisoned".into(),
        })
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
        }
        let body = toml::to_string(entries).map_err(|e| self.store_error(e))?;
        let tmp = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp, body).map_err(|e| self.store_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.store_error(e))?;
        debug!(path = %self.path.display(), "state file written");
        Ok(())
    }

    fn store_error(&self, err: impl std::fmt::Display) -> CoreError {
        CoreError::Store {
            message: format!("{}: {err}", self.path.display()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.lock()?;
        if entries.get(key).is_some_and(|v| v == value) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.insert(key.to_owned(), value.to_owned());
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.lock()?;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.flush(&next)?;
        *entries = next;
        Ok(())
    }
}
