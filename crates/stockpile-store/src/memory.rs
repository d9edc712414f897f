//! # In-Memory Store
//!
//! A `HashMap`-backed [`KeyValueStore`] that lives only as long as the
//! process. Used by tests and by the `memory` storage backend.
//!
//! Reads and writes can be made to fail on demand, so callers can
//! exercise their error paths without a broken disk.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::kv::KeyValueStore;

/// Volatile key-value store.
///
/// ## Usage
/// ```rust
/// use stockpile_store::{KeyValueStore, MemoryStore};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let store = MemoryStore::new();
///     store.set("@categories", "[\"Food\"]").await.unwrap();
///     assert_eq!(store.get("@categories").await.unwrap().as_deref(), Some("[\"Food\"]"));
///     assert_eq!(store.write_count(), 1);
/// });
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = store.lock();
            for (key, value) in entries {
                map.insert(key.into(), value.into());
            }
        }
        store
    }

    /// Makes every subsequent `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value of `key`, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // Inserts are single calls; a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("read of {key} rejected")));
        }
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("write of {key} rejected")));
        }
        self.lock().insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(key, bytes = value.len(), "Memory store write");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("@products").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "1").await.unwrap();
        store.set("k", "2").await.unwrap();

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryStore::with_entries([("k", "v")]);

        store.fail_reads(true);
        assert!(matches!(store.get("k").await, Err(StoreError::Unavailable(_))));
        store.fail_reads(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        store.fail_writes(true);
        assert!(store.set("k", "w").await.is_err());
        assert_eq!(store.peek("k").as_deref(), Some("v"));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_default_set_many_writes_each_entry() {
        let store = MemoryStore::new();
        store
            .set_many(&[
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ])
            .await
            .unwrap();

        assert_eq!(store.peek("a").as_deref(), Some("1"));
        assert_eq!(store.peek("b").as_deref(), Some("2"));
        assert_eq!(store.write_count(), 2);
    }
}
