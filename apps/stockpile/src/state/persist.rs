//! # Write-Behind Persistence
//!
//! Background worker that writes inventory snapshots to the store.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Write-Behind Worker                                  │
//! │                                                                         │
//! │  InventoryState mutation (sync, returns immediately)                   │
//! │       │                                                                 │
//! │       │  PersistHandle::save(snapshot)                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────┐     ┌──────────────────────────────┐  │
//! │  │  latest slot (one snapshot) │     │  control queue               │  │
//! │  │  s1 ─► replaced by s2 ─► s3 │     │  Flush(ack)  Shutdown(ack)   │  │
//! │  └──────────────┬──────────────┘     └──────────────┬───────────────┘  │
//! │                 │ Notify                            │                   │
//! │                 ▼                                   ▼                   │
//! │  PersistWorker::run                                                    │
//! │    1. Take whatever is in the slot (s3)                                │
//! │    2. Encode products + categories                                     │
//! │    3. store.set_many([@products, @categories])                         │
//! │    4. Flush: write the slot, then ack                                  │
//! │                                                                         │
//! │  Failures are logged and counted; memory is never rolled back.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! One worker owns every write and the slot only ever holds the newest
//! snapshot, so the last write wins. A slow store holds at most one
//! snapshot in flight plus one waiting.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use stockpile_core::codec::{encode_categories, encode_products};
use stockpile_core::{CategorySet, CoreResult, Product, CATEGORIES_KEY, PRODUCTS_KEY};
use stockpile_store::KeyValueStore;
use tokio::sync::{mpsc, oneshot, Notify};
use tracing::{debug, error, info, warn};

// =============================================================================
// Snapshot & Stats
// =============================================================================

/// Full copy of both persisted collections at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub categories: CategorySet,
}

impl Snapshot {
    /// Encodes the snapshot into store entries.
    fn encode(&self) -> CoreResult<Vec<(String, String)>> {
        Ok(vec![
            (PRODUCTS_KEY.to_string(), encode_products(&self.products)?),
            (CATEGORIES_KEY.to_string(), encode_categories(&self.categories)?),
        ])
    }
}

/// Counters describing the worker's history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistStats {
    /// Snapshots handed to the worker.
    pub snapshots_queued: u64,

    /// Snapshots replaced by a newer one before they were written.
    pub snapshots_coalesced: u64,

    /// Successful store writes.
    pub writes_succeeded: u64,

    /// Failed store writes (including encoding failures).
    pub writes_failed: u64,

    /// Message of the most recent failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

type SharedStats = Arc<Mutex<PersistStats>>;

fn lock_stats(stats: &SharedStats) -> MutexGuard<'_, PersistStats> {
    stats.lock().unwrap_or_else(PoisonError::into_inner)
}

fn record_failure(stats: &SharedStats, message: String) {
    let mut stats = lock_stats(stats);
    stats.writes_failed += 1;
    stats.last_error = Some(message);
}

// =============================================================================
// Pending Slot
// =============================================================================

#[derive(Debug, Default)]
struct Slot {
    latest: Option<Snapshot>,
    /// Set once the worker has stopped; later saves are refused.
    stopped: bool,
}

/// The newest unwritten snapshot plus the wake-up signal for the worker.
#[derive(Debug, Default)]
struct Pending {
    slot: Mutex<Slot>,
    wake: Notify,
}

impl Pending {
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take(&self) -> Option<Snapshot> {
        self.lock().latest.take()
    }

    /// Takes the last snapshot and refuses any further ones.
    fn close(&self) -> Option<Snapshot> {
        let mut slot = self.lock();
        slot.stopped = true;
        slot.latest.take()
    }
}

// =============================================================================
// Control Commands
// =============================================================================

#[derive(Debug)]
enum Control {
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

// =============================================================================
// Handle
// =============================================================================

/// Sending side of the worker. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    control: mpsc::UnboundedSender<Control>,
    pending: Arc<Pending>,
    stats: SharedStats,
}

impl PersistHandle {
    /// Hands a snapshot to the worker. Never blocks.
    ///
    /// An unwritten older snapshot is replaced.
    pub fn save(&self, snapshot: Snapshot) {
        let replaced = {
            let mut slot = self.pending.lock();
            if slot.stopped {
                drop(slot);
                warn!("Persist worker has stopped; snapshot dropped");
                record_failure(&self.stats, "persist worker stopped".to_string());
                return;
            }
            slot.latest.replace(snapshot).is_some()
        };

        {
            let mut stats = lock_stats(&self.stats);
            stats.snapshots_queued += 1;
            if replaced {
                stats.snapshots_coalesced += 1;
            }
        }
        self.pending.wake.notify_one();
    }

    /// Waits until every snapshot handed over before this call has been
    /// written (or has failed).
    ///
    /// Returns immediately if the worker has stopped.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.control.send(Control::Flush(ack_tx)).is_err() {
            debug!("Flush requested after worker stopped");
            return;
        }
        let _ = ack_rx.await;
    }

    /// Writes the pending snapshot, then stops the worker.
    ///
    /// Later `save` calls are dropped (and counted as failed).
    pub async fn shutdown(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.control.send(Control::Shutdown(ack_tx)).is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    /// Current counters.
    pub fn stats(&self) -> PersistStats {
        lock_stats(&self.stats).clone()
    }
}

// =============================================================================
// Worker
// =============================================================================

/// Receiving side: owns the store for writes.
pub struct PersistWorker {
    store: Arc<dyn KeyValueStore>,
    control: mpsc::UnboundedReceiver<Control>,
    pending: Arc<Pending>,
    stats: SharedStats,
}

impl PersistWorker {
    /// Creates a worker and its handle. The worker does nothing until
    /// [`run`](Self::run) is spawned.
    pub fn new(store: Arc<dyn KeyValueStore>) -> (Self, PersistHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let pending = Arc::new(Pending::default());
        let stats = SharedStats::default();

        let worker = PersistWorker {
            store,
            control: rx,
            pending: pending.clone(),
            stats: stats.clone(),
        };
        let handle = PersistHandle {
            control: tx,
            pending,
            stats,
        };

        (worker, handle)
    }

    /// Runs the worker loop until shutdown or until every handle is dropped.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        info!("Persist worker starting");
        let pending = self.pending.clone();

        loop {
            tokio::select! {
                biased;

                command = self.control.recv() => match command {
                    Some(Control::Flush(ack)) => {
                        self.write_pending().await;
                        let _ = ack.send(());
                    }
                    Some(Control::Shutdown(ack)) => {
                        info!("Persist worker shutting down");
                        self.stop().await;
                        let _ = ack.send(());
                        return;
                    }
                    None => {
                        self.stop().await;
                        info!("Persist worker stopped (all handles dropped)");
                        return;
                    }
                },

                () = pending.wake.notified() => self.write_pending().await,
            }
        }
    }

    async fn write_pending(&self) {
        if let Some(snapshot) = self.pending.take() {
            self.write(&snapshot).await;
        }
    }

    async fn stop(&mut self) {
        self.control.close();
        if let Some(snapshot) = self.pending.close() {
            self.write(&snapshot).await;
        }
    }

    async fn write(&self, snapshot: &Snapshot) {
        let entries = match snapshot.encode() {
            Ok(entries) => entries,
            Err(e) => {
                error!(error = %e, "Failed to encode inventory snapshot");
                record_failure(&self.stats, e.to_string());
                return;
            }
        };

        match self.store.set_many(&entries).await {
            Ok(()) => {
                debug!(
                    products = snapshot.products.len(),
                    categories = snapshot.categories.len(),
                    "Inventory persisted"
                );
                lock_stats(&self.stats).writes_succeeded += 1;
            }
            Err(e) => {
                error!(error = %e, "Error saving data");
                record_failure(&self.stats, e.to_string());
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use stockpile_core::codec::decode_products;
    use async_trait::async_trait;
    use stockpile_core::ProductDraft;
    use stockpile_store::{MemoryStore, StoreResult};
    use tokio::sync::Semaphore;

    fn snapshot(names: &[&str]) -> Snapshot {
        Snapshot {
            products: names
                .iter()
                .map(|n| {
                    let draft = ProductDraft::new(*n, "Other", 1.0, 1, 0);
                    Product::from_draft(*n, draft, chrono::Utc::now())
                })
                .collect(),
            categories: CategorySet::default(),
        }
    }

    fn spawn(store: Arc<dyn KeyValueStore>) -> PersistHandle {
        let (worker, handle) = PersistWorker::new(store);
        tokio::spawn(worker.run());
        handle
    }

    #[tokio::test]
    async fn test_flush_waits_for_queued_writes() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn(store.clone());

        handle.save(snapshot(&["a"]));
        handle.save(snapshot(&["a", "b"]));
        handle.flush().await;

        let stored = decode_products(&store.peek(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(store.peek(CATEGORIES_KEY).is_some());

        let stats = handle.stats();
        assert_eq!(stats.snapshots_queued, 2);
        assert_eq!(stats.writes_failed, 0);
        assert_eq!(
            stats.writes_succeeded + stats.snapshots_coalesced,
            2,
            "every snapshot is either written or superseded"
        );
    }

    #[tokio::test]
    async fn test_failures_are_counted_not_propagated() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes(true);
        let handle = spawn(store.clone());

        handle.save(snapshot(&["a"]));
        handle.flush().await;

        let stats = handle.stats();
        assert_eq!(stats.writes_failed, 1);
        assert!(stats.last_error.is_some());
        assert!(store.peek(PRODUCTS_KEY).is_none());

        store.fail_writes(false);
        handle.save(snapshot(&["a", "b", "c"]));
        handle.flush().await;
        assert_eq!(handle.stats().writes_succeeded, 1);
    }

    #[tokio::test]
    async fn test_shutdown_drains_then_stops() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn(store.clone());

        handle.save(snapshot(&["a"]));
        handle.shutdown().await;
        assert!(store.peek(PRODUCTS_KEY).is_some());

        handle.save(snapshot(&["a", "b"]));
        handle.flush().await;

        let stored = decode_products(&store.peek(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(handle.stats().writes_failed, 1);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn(store.clone());

        for n in 1..=20 {
            let owned = names(n);
            let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
            handle.save(snapshot(&refs));
        }
        handle.flush().await;

        let stored = decode_products(&store.peek(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 20);
    }

    /// Store whose writes wait until the gate is closed.
    struct GatedStore {
        inner: MemoryStore,
        gate: Semaphore,
    }

    #[async_trait]
    impl KeyValueStore for GatedStore {
        async fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            // A closed semaphore lets every writer through.
            let _permit = self.gate.acquire().await;
            self.inner.set(key, value).await
        }
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("p{i}")).collect()
    }

    #[tokio::test]
    async fn test_slow_store_keeps_one_pending_snapshot() {
        let store = Arc::new(GatedStore {
            inner: MemoryStore::new(),
            gate: Semaphore::new(0),
        });
        let handle = spawn(store.clone());

        handle.save(snapshot(&["p0"]));
        // Let the worker pick up the first snapshot and block on the store
        tokio::task::yield_now().await;

        for n in 2..=100 {
            let owned = names(n);
            let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
            handle.save(snapshot(&refs));
        }

        let stats = handle.stats();
        assert_eq!(stats.snapshots_queued, 100);
        assert!(
            stats.snapshots_queued - stats.snapshots_coalesced <= 2,
            "at most one snapshot in flight and one waiting: {stats:?}"
        );

        store.gate.close();
        handle.flush().await;

        let stored = decode_products(&store.inner.peek(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 100);
        assert!(handle.stats().writes_succeeded <= 2);
    }

    #[tokio::test]
    async fn test_unencodable_snapshot_keeps_previous_write() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn(store.clone());

        handle.save(snapshot(&["a"]));
        handle.flush().await;

        let mut bad = snapshot(&["a", "b"]);
        bad.products[1].price = f64::NAN;
        handle.save(bad);
        handle.flush().await;

        let stats = handle.stats();
        assert_eq!(stats.writes_failed, 1);
        assert!(stats.last_error.unwrap().contains("non-finite"));

        let stored = decode_products(&store.peek(PRODUCTS_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
    }
}
