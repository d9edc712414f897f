//! # Inventory State
//!
//! The single source of truth for products and categories.
//!
//! ## Thread Safety
//! The collections live behind `Arc<Mutex<T>>`:
//! 1. Every operation locks, mutates and unlocks without awaiting
//! 2. No reader ever observes a half-applied mutation
//! 3. Clones share the same inventory
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inventory Operations                                 │
//! │                                                                         │
//! │  Caller                   InventoryState            Side effect         │
//! │  ──────                   ──────────────            ───────────         │
//! │                                                                         │
//! │  startup ────────────────► load().await ──────────► reads both keys    │
//! │                                                      loading = false    │
//! │                                                                         │
//! │  Add form ───────────────► add_product() ─────────► push + snapshot    │
//! │                                                                         │
//! │  Edit form ──────────────► update_product() ──────► replace + snapshot │
//! │                                                                         │
//! │  Delete ─────────────────► delete_product() ──────► retain + snapshot  │
//! │                                                                         │
//! │  New category ───────────► add_category() ────────► insert + snapshot  │
//! │                                                                         │
//! │  Dashboard ──────────────► stats() / low_stock_products() (read only)  │
//! │                                                                         │
//! │  NOTE: snapshots are only queued once loading is false, so nothing     │
//! │        overwrites stored data before it has been read.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use stockpile_core::codec::{decode_categories, decode_products};
use stockpile_core::query::{category_counts, ProductQuery};
use stockpile_core::stats::{compute_stats, low_stock, out_of_stock};
use stockpile_core::{
    CategorySet, CoreResult, InventoryStats, Product, ProductDraft, CATEGORIES_KEY, PRODUCTS_KEY,
};
use stockpile_store::KeyValueStore;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::persist::{PersistHandle, PersistStats, PersistWorker, Snapshot};

// =============================================================================
// Load Report
// =============================================================================

/// What happened to one key during [`InventoryState::load`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum KeyLoad {
    /// Stored value decoded; `count` items loaded.
    Loaded { count: usize },
    /// Key has never been written.
    Missing,
    /// Read or decode failed; the collection kept its previous value.
    Failed { error: String },
}

impl KeyLoad {
    pub fn is_failed(&self) -> bool {
        matches!(self, KeyLoad::Failed { .. })
    }
}

/// Per-key outcome of a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub products: KeyLoad,
    pub categories: KeyLoad,
}

impl LoadReport {
    /// `true` if neither key failed.
    pub fn is_clean(&self) -> bool {
        !self.products.is_failed() && !self.categories.is_failed()
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// The guarded collections.
#[derive(Debug)]
struct Inventory {
    products: Vec<Product>,
    categories: CategorySet,
    loading: bool,
}

impl Inventory {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            products: self.products.clone(),
            categories: self.categories.clone(),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Inventory {
            products: Vec::new(),
            categories: CategorySet::default(),
            loading: true,
        }
    }
}

// =============================================================================
// InventoryState
// =============================================================================

/// Shared inventory state manager.
///
/// ## Usage
/// ```rust,ignore
/// let inventory = InventoryState::new(Arc::new(MemoryStore::new()));
/// inventory.load().await;
///
/// let widget = inventory.add_product(ProductDraft::new("Widget", "Other", 9.99, 5, 10));
/// assert_eq!(inventory.stats().low_stock_items, 1);
///
/// inventory.flush().await; // wait for the write-behind
/// ```
#[derive(Clone)]
pub struct InventoryState {
    inner: Arc<Mutex<Inventory>>,
    store: Arc<dyn KeyValueStore>,
    persist: PersistHandle,
}

impl InventoryState {
    /// Creates an empty, still-loading inventory over `store` and spawns
    /// its persist worker.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (worker, persist) = PersistWorker::new(store.clone());
        tokio::spawn(worker.run());

        InventoryState {
            inner: Arc::new(Mutex::new(Inventory::default())),
            store,
            persist,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inventory> {
        // Mutations never panic half-way, so a poisoned guard is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `f` under the lock, then queues a snapshot unless still
    /// loading.
    ///
    /// The snapshot is queued before the lock is released so that queue
    /// order matches mutation order.
    fn mutate<R>(&self, op: &'static str, f: impl FnOnce(&mut Inventory) -> R) -> R {
        let mut inventory = self.lock();
        let result = f(&mut inventory);

        if inventory.loading {
            debug!(op, "Load not complete, skipping persist");
        } else {
            self.persist.save(inventory.snapshot());
        }

        result
    }

    // =========================================================================
    // Load
    // =========================================================================

    /// Reads both collections from the store.
    ///
    /// ## Behavior
    /// - Present key: replaces the in-memory collection
    /// - Absent key: keeps the in-memory collection (the default at startup)
    /// - Read or decode failure: logged, collection kept, reported
    ///
    /// `loading` is false afterwards whatever happened. Loading writes
    /// nothing back.
    pub async fn load(&self) -> LoadReport {
        let products = self.read_key(PRODUCTS_KEY, decode_products).await;
        let categories = self.read_key(CATEGORIES_KEY, decode_categories).await;

        let mut inventory = self.lock();

        let products_outcome = match products {
            Ok(Some(products)) => {
                let count = products.len();
                inventory.products = products;
                KeyLoad::Loaded { count }
            }
            Ok(None) => KeyLoad::Missing,
            Err(error) => KeyLoad::Failed { error },
        };

        let categories_outcome = match categories {
            Ok(Some(categories)) => {
                let count = categories.len();
                inventory.categories = categories;
                KeyLoad::Loaded { count }
            }
            Ok(None) => KeyLoad::Missing,
            Err(error) => KeyLoad::Failed { error },
        };

        inventory.loading = false;

        info!(
            products = inventory.products.len(),
            categories = inventory.categories.len(),
            "Inventory loaded"
        );

        LoadReport {
            products: products_outcome,
            categories: categories_outcome,
        }
    }

    async fn read_key<T>(
        &self,
        key: &str,
        decode: fn(&str) -> CoreResult<T>,
    ) -> Result<Option<T>, String> {
        let raw = match self.store.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(key, error = %e, "Error loading data");
                return Err(e.to_string());
            }
        };

        match raw {
            None => {
                debug!(key, "Nothing stored, keeping defaults");
                Ok(None)
            }
            Some(raw) => decode(&raw).map(Some).map_err(|e| {
                error!(key, error = %e, "Error loading data");
                e.to_string()
            }),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds a product with a fresh id and `createdAt = now`.
    ///
    /// The draft is stored as given; validate it first.
    pub fn add_product(&self, draft: ProductDraft) -> Product {
        let product = Product::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());

        self.mutate("add_product", |inventory| {
            inventory.products.push(product.clone());
        });

        info!(id = %product.id, name = %product.name, "Product added");
        product
    }

    /// Replaces the editable fields of product `id` with `draft`.
    ///
    /// `id` and `createdAt` are kept. Returns `false` (and changes nothing)
    /// if no product has that id.
    pub fn update_product(&self, id: &str, draft: ProductDraft) -> bool {
        let updated = self.mutate("update_product", |inventory| {
            match inventory.products.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    product.apply_draft(draft);
                    true
                }
                None => false,
            }
        });

        if updated {
            info!(id, "Product updated");
        } else {
            debug!(id, "update_product: no such product");
        }
        updated
    }

    /// Removes product `id`. Returns `false` if it was not there.
    pub fn delete_product(&self, id: &str) -> bool {
        let deleted = self.mutate("delete_product", |inventory| {
            let before = inventory.products.len();
            inventory.products.retain(|p| p.id != id);
            inventory.products.len() != before
        });

        if deleted {
            info!(id, "Product deleted");
        } else {
            debug!(id, "delete_product: no such product");
        }
        deleted
    }

    /// Appends a category unless an identical name exists.
    ///
    /// Returns `true` if it was added.
    pub fn add_category(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        let added = self.mutate("add_category", |inventory| {
            inventory.categories.insert(name.clone())
        });

        if added {
            info!(category = %name, "Category added");
        }
        added
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// `true` until [`load`](Self::load) has completed.
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// All products, in insertion order.
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    pub fn categories(&self) -> CategorySet {
        self.lock().categories.clone()
    }

    pub fn product(&self, id: &str) -> Option<Product> {
        self.lock().products.iter().find(|p| p.id == id).cloned()
    }

    pub fn stats(&self) -> InventoryStats {
        compute_stats(&self.lock().products)
    }

    /// Products with `0 < quantity <= lowStockThreshold`.
    pub fn low_stock_products(&self) -> Vec<Product> {
        low_stock(&self.lock().products)
    }

    /// Products with `quantity == 0`.
    pub fn out_of_stock_products(&self) -> Vec<Product> {
        out_of_stock(&self.lock().products)
    }

    /// Runs a search / filter / sort over the products.
    pub fn query(&self, query: &ProductQuery) -> Vec<Product> {
        query.apply(&self.lock().products)
    }

    /// `("All", n)` followed by one entry per category.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        let inventory = self.lock();
        category_counts(&inventory.products, &inventory.categories)
    }

    // =========================================================================
    // Persistence control
    // =========================================================================

    /// Waits until every snapshot queued so far has been written or has
    /// failed.
    pub async fn flush(&self) {
        self.persist.flush().await;
    }

    /// Flushes and stops the persist worker. Later mutations stay in
    /// memory only.
    pub async fn shutdown(&self) {
        self.persist.shutdown().await;
    }

    pub fn persist_stats(&self) -> PersistStats {
        self.persist.stats()
    }
}

impl std::fmt::Debug for InventoryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inventory = self.lock();
        f.debug_struct("InventoryState")
            .field("products", &inventory.products.len())
            .field("categories", &inventory.categories.len())
            .field("loading", &inventory.loading)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
