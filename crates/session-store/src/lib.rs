use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};

/// Well-known keys shared by the coordinators. These names are a fixed
/// contract with anything else reading the same session.
pub mod keys {
    pub const STOCKS: &str = "stocks";
    pub const SECTORS: &str = "sectors";
    pub const PREDICTIONS: &str = "predictions";
    pub const DATA_LAST_UPDATED: &str = "dataLastUpdated";
    pub const MODEL_LOADED: &str = "modelLoaded";
    pub const MODEL_LAST_CHECKED: &str = "modelLastChecked";
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// Session-scoped key/value cache. Values are plain text; writes replace
/// the whole value. The store never expires entries on its own, staleness
/// is entirely the caller's concern.
pub trait SessionStore: Send + Sync {
    /// Raw text under `key`, or `None` if never written this session.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value under `key`.
    fn set(&self, key: &str, value: String);
}

/// In-memory store with tab-session lifetime semantics: contents live
/// exactly as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

// ---------------------------------------------------------------------------
// Typed access
// ---------------------------------------------------------------------------

/// A cached value together with the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn now(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }
}

/// Typed reads and writes on top of the raw text contract.
///
/// Every parse failure on read is a cache miss, never an error: a corrupt
/// entry behaves exactly like an absent one and gets overwritten by the
/// next successful fetch.
pub trait SessionStoreExt: SessionStore {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("discarding unreadable cache entry '{}': {}", key, e);
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(text) => self.set(key, text),
            Err(e) => tracing::warn!("failed to serialize cache entry '{}': {}", key, e),
        }
    }

    /// Timestamp stored as RFC 3339 text.
    fn get_stamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.get(key)?;
        match raw.parse::<DateTime<Utc>>() {
            Ok(stamp) => Some(stamp),
            Err(e) => {
                tracing::debug!("discarding unreadable timestamp '{}': {}", key, e);
                None
            }
        }
    }

    fn set_stamp(&self, key: &str, stamp: DateTime<Utc>) {
        self.set(key, stamp.to_rfc3339());
    }

    /// Value plus its fetch stamp, stored under a pair of keys. Missing or
    /// corrupt halves make the whole entry a miss.
    fn get_entry<T: DeserializeOwned>(&self, value_key: &str, stamp_key: &str) -> Option<CacheEntry<T>> {
        let data = self.get_json(value_key)?;
        let cached_at = self.get_stamp(stamp_key)?;
        Some(CacheEntry { data, cached_at })
    }

    fn put_entry<T: Serialize>(&self, value_key: &str, stamp_key: &str, entry: &CacheEntry<T>) {
        self.set_json(value_key, &entry.data);
        self.set_stamp(stamp_key, entry.cached_at);
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_none_before_first_write() {
        let store = MemoryStore::new();
        assert!(store.get("stocks").is_none());
    }

    #[test]
    fn test_set_replaces_whole_value() {
        let store = MemoryStore::new();
        store.set("stocks", "[1]".to_string());
        store.set("stocks", "[2,3]".to_string());
        assert_eq!(store.get("stocks").as_deref(), Some("[2,3]"));
    }

    #[test]
    fn test_json_roundtrip() {
        let store = MemoryStore::new();
        store.set_json(keys::STOCKS, &vec!["INFY".to_string(), "TCS".to_string()]);

        let back: Vec<String> = store.get_json(keys::STOCKS).unwrap();
        assert_eq!(back, vec!["INFY", "TCS"]);
    }

    #[test]
    fn test_corrupt_json_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(keys::PREDICTIONS, "{not json!".to_string());

        let back: Option<Vec<String>> = store.get_json(keys::PREDICTIONS);
        assert!(back.is_none());
    }

    #[test]
    fn test_bool_flag_as_text() {
        let store = MemoryStore::new();
        store.set_json(keys::MODEL_LOADED, &true);
        assert_eq!(store.get(keys::MODEL_LOADED).as_deref(), Some("true"));
        assert_eq!(store.get_json::<bool>(keys::MODEL_LOADED), Some(true));
    }

    #[test]
    fn test_stamp_roundtrip() {
        let store = MemoryStore::new();
        let stamp = Utc::now();
        store.set_stamp(keys::DATA_LAST_UPDATED, stamp);
        assert_eq!(store.get_stamp(keys::DATA_LAST_UPDATED), Some(stamp));
    }

    #[test]
    fn test_corrupt_stamp_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(keys::MODEL_LAST_CHECKED, "yesterday-ish".to_string());
        assert!(store.get_stamp(keys::MODEL_LAST_CHECKED).is_none());
    }

    #[test]
    fn test_entry_requires_both_halves() {
        let store = MemoryStore::new();
        store.set_json(keys::MODEL_LOADED, &true);
        assert!(store
            .get_entry::<bool>(keys::MODEL_LOADED, keys::MODEL_LAST_CHECKED)
            .is_none());

        store.set_stamp(keys::MODEL_LAST_CHECKED, Utc::now());
        let entry = store
            .get_entry::<bool>(keys::MODEL_LOADED, keys::MODEL_LAST_CHECKED)
            .unwrap();
        assert!(entry.data);
    }

    #[test]
    fn test_put_entry_writes_both_keys() {
        let store = MemoryStore::new();
        store.put_entry(keys::MODEL_LOADED, keys::MODEL_LAST_CHECKED, &CacheEntry::now(false));

        assert_eq!(store.get(keys::MODEL_LOADED).as_deref(), Some("false"));
        assert!(store.get_stamp(keys::MODEL_LAST_CHECKED).is_some());
    }

    #[test]
    fn test_ext_methods_work_through_dyn_store() {
        let store: std::sync::Arc<dyn SessionStore> = std::sync::Arc::new(MemoryStore::new());
        store.set_json("k", &42u32);
        assert_eq!(store.get_json::<u32>("k"), Some(42));
    }
}
