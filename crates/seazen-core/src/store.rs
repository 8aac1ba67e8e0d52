// ── Persistent address storage ──
//
// The coordinator remembers the last origin that answered so the next
// session can skip discovery. Storage itself is a collaborator: anything
// that can hold strings across restarts implements `KeyValueStore`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::Origin;

const HOST_KEY: &str = "host";
const LAST_SUCCESS_KEY: &str = "last_success";

/// A string key-value store that survives restarts.
///
/// Writes are last-write-wins; the coordinator never writes concurrently.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: &str) -> Result<(), CoreError>;
}

/// Process-local store. Used by tests and by one-shot runs with `--no-save`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Last known-good lamp address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAddress {
    /// Origin string, e.g. `http://10.0.0.5`.
    pub origin: String,
    /// When the origin last answered successfully, if recorded.
    pub last_success: Option<DateTime<Utc>>,
}

/// Namespaced view over a `KeyValueStore` holding one lamp's address.
#[derive(Clone)]
pub struct AddressBook {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
}

impl AddressBook {
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{name}", self.namespace)
    }

    /// Read the remembered address. Unparseable timestamps are ignored.
    pub fn load(&self) -> Result<Option<PersistedAddress>, CoreError> {
        let Some(origin) = self.store.get(&self.key(HOST_KEY))? else {
            return Ok(None);
        };
        if origin.trim().is_empty() {
            return Ok(None);
        }

        let last_success = self
            .store
            .get(&self.key(LAST_SUCCESS_KEY))?
            .and_then(|raw| match DateTime::parse_from_rfc3339(&raw) {
                Ok(ts) => Some(ts.with_timezone(&Utc)),
                Err(e) => {
                    warn!(error = %e, raw, "ignoring unparseable last-success timestamp");
                    None
                }
            });

        Ok(Some(PersistedAddress {
            origin,
            last_success,
        }))
    }

    /// Record `origin` as known-good as of `at`. Overwrites any previous value.
    pub fn save(&self, origin: &Origin, at: DateTime<Utc>) -> Result<(), CoreError> {
        let value = origin.as_origin_string();
        self.store.set(&self.key(HOST_KEY), &value)?;
        self.store
            .set(&self.key(LAST_SUCCESS_KEY), &at.to_rfc3339())?;
        debug!(origin = %value, "persisted lamp address");
        Ok(())
    }

    /// Drop the remembered address. Only ever user-initiated.
    pub fn forget(&self) -> Result<(), CoreError> {
        self.store.remove(&self.key(HOST_KEY))?;
        self.store.remove(&self.key(LAST_SUCCESS_KEY))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn book(namespace: &str) -> (Arc<MemoryStore>, AddressBook) {
        let store = Arc::new(MemoryStore::new());
        let book = AddressBook::new(store.clone(), namespace);
        (store, book)
    }

    #[test]
    fn save_then_load() {
        let (_store, book) = book("lamp/");
        let origin = Origin::from_user_input("10.0.0.5").unwrap();
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();

        book.save(&origin, at).unwrap();
        let loaded = book.load().unwrap().unwrap();

        assert_eq!(loaded.origin, "http://10.0.0.5");
        assert_eq!(loaded.last_success, Some(at));
    }

    #[test]
    fn namespaces_do_not_collide() {
        let store = Arc::new(MemoryStore::new());
        let kitchen = AddressBook::new(store.clone(), "kitchen/");
        let hall = AddressBook::new(store.clone(), "hall/");

        kitchen
            .save(&Origin::from_user_input("10.0.0.5").unwrap(), Utc::now())
            .unwrap();

        assert!(hall.load().unwrap().is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn bad_timestamp_is_tolerated() {
        let (store, book) = book("");
        store.set("host", "http://10.0.0.7").unwrap();
        store.set("last_success", "yesterday-ish").unwrap();

        let loaded = book.load().unwrap().unwrap();
        assert_eq!(loaded.origin, "http://10.0.0.7");
        assert_eq!(loaded.last_success, None);
    }

    #[test]
    fn forget_clears_both_keys() {
        let (store, book) = book("");
        book.save(&Origin::from_user_input("10.0.0.5").unwrap(), Utc::now())
            .unwrap();
        book.forget().unwrap();
        assert!(store.is_empty());
        assert!(book.load().unwrap().is_none());
    }
}
