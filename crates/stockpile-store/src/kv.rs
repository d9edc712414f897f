//! # Key-Value Store Contract
//!
//! The persistence seam of the inventory. A store maps string keys to
//! string values and must survive process restarts (except `MemoryStore`).
//!
//! ```text
//!   InventoryState ──► Arc<dyn KeyValueStore> ──┬─► SqliteStore (disk)
//!                                               └─► MemoryStore (tests)
//! ```

use async_trait::async_trait;

use crate::error::StoreResult;

/// Durable string-keyed, string-valued store.
///
/// Implementations must be safe to share across tasks; the inventory holds
/// one behind an `Arc<dyn KeyValueStore>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads `key`. `Ok(None)` means the key has never been written.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes several entries.
    ///
    /// The default writes them one by one and stops at the first failure.
    /// Backends with transactions override this to make the batch atomic.
    async fn set_many(&self, entries: &[(String, String)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }
}
