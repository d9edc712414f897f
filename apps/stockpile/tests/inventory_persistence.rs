//! End-to-end tests of the inventory against real stores: load semantics,
//! write-behind persistence, and failure handling.

use std::path::PathBuf;
use std::sync::Arc;

use stockpile_app::state::{AppConfig, InventoryState, KeyLoad, StorageBackend};
use stockpile_core::codec::{decode_categories, decode_products};
use stockpile_core::{CategorySet, ProductDraft, CATEGORIES_KEY, DEFAULT_CATEGORIES, PRODUCTS_KEY};
use stockpile_store::{KeyValueStore, MemoryStore, SqliteStore, StoreConfig};

fn widget() -> ProductDraft {
    ProductDraft::new("Widget", "Other", 9.99, 5, 10)
}

async fn loaded(store: Arc<MemoryStore>) -> InventoryState {
    let inventory = InventoryState::new(store);
    inventory.load().await;
    inventory
}

fn stored_products(store: &MemoryStore) -> Vec<stockpile_core::Product> {
    decode_products(&store.peek(PRODUCTS_KEY).expect("products written")).unwrap()
}

// =============================================================================
// Basic behaviour
// =============================================================================

#[tokio::test]
async fn adding_a_widget_counts_it_as_low_stock() {
    let inventory = loaded(Arc::new(MemoryStore::new())).await;

    inventory.add_product(widget());

    let stats = inventory.stats();
    assert_eq!(stats.total_products, 1);
    assert_eq!(stats.low_stock_items, 1);
    assert_eq!(stats.out_of_stock, 0);
    assert!((stats.total_value - 49.95).abs() < 1e-9);
}

#[tokio::test]
async fn zero_quantity_is_out_of_stock_not_low_stock() {
    let inventory = loaded(Arc::new(MemoryStore::new())).await;

    inventory.add_product(ProductDraft::new("Gizmo", "Other", 3.0, 0, 10));

    let stats = inventory.stats();
    assert_eq!(stats.out_of_stock, 1);
    assert_eq!(stats.low_stock_items, 0);
    assert!(inventory.low_stock_products().is_empty());
    assert_eq!(inventory.out_of_stock_products().len(), 1);
}

#[tokio::test]
async fn empty_store_loads_defaults() {
    let store = Arc::new(MemoryStore::new());
    let inventory = InventoryState::new(store.clone());

    let report = inventory.load().await;
    inventory.flush().await;

    assert!(!inventory.is_loading());
    assert!(inventory.products().is_empty());
    assert_eq!(inventory.categories(), CategorySet::default());
    assert_eq!(report.products, KeyLoad::Missing);
    // Loading never writes back
    assert_eq!(store.write_count(), 0);
}

// =============================================================================
// Persistence round trips
// =============================================================================

#[tokio::test]
async fn state_survives_a_restart_on_memory_store() {
    let store = Arc::new(MemoryStore::new());

    let first = loaded(store.clone()).await;
    let kept = first.add_product(widget());
    let dropped = first.add_product(ProductDraft::new("Temp", "Food", 1.0, 1, 1));
    first.update_product(&kept.id, ProductDraft::new("Widget", "Other", 9.99, 50, 10));
    first.delete_product(&dropped.id);
    first.add_category("Toys");
    first.shutdown().await;

    let second = InventoryState::new(store);
    let report = second.load().await;

    assert_eq!(report.products, KeyLoad::Loaded { count: 1 });
    assert_eq!(report.categories, KeyLoad::Loaded { count: 6 });
    assert_eq!(second.products(), first.products());
    assert_eq!(second.product(&kept.id).map(|p| p.quantity), Some(50));
    assert!(second.categories().contains("Toys"));
}

#[tokio::test]
async fn state_survives_a_restart_on_sqlite() {
    let sqlite = SqliteStore::new(StoreConfig::in_memory()).await.unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(sqlite);

    let first = InventoryState::new(store.clone());
    first.load().await;
    let product = first.add_product(widget().with_description("Blue"));
    first.add_category("Garden");
    first.flush().await;

    let raw = store.get(CATEGORIES_KEY).await.unwrap().unwrap();
    assert_eq!(decode_categories(&raw).unwrap().len(), 6);

    let second = InventoryState::new(store);
    second.load().await;

    let restored = second.product(&product.id).unwrap();
    assert_eq!(restored, product);
    assert_eq!(restored.description.as_deref(), Some("Blue"));
    assert!(second.categories().contains("Garden"));
}

#[tokio::test]
async fn start_reopens_a_sqlite_file() {
    let path = std::env::temp_dir().join(format!("stockpile-test-{}.db", uuid::Uuid::new_v4()));
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Sqlite;
    config.storage.path = Some(path.clone());

    let first = stockpile_app::start(&config).await.unwrap();
    let product = first.add_product(widget());
    first.shutdown().await;

    let second = stockpile_app::start(&config).await.unwrap();
    assert_eq!(second.products(), vec![product]);
    second.shutdown().await;

    cleanup(path);
}

fn cleanup(path: PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[tokio::test]
async fn stored_snapshot_matches_memory_after_flush() {
    let store = Arc::new(MemoryStore::new());
    let inventory = loaded(store.clone()).await;

    for i in 0..20 {
        inventory.add_product(ProductDraft::new(format!("Item {}", i), "Other", 1.0, i, 5));
    }
    inventory.flush().await;

    assert_eq!(stored_products(&store), inventory.products());
}

// =============================================================================
// Load semantics
// =============================================================================

#[tokio::test]
async fn mutations_before_load_are_not_persisted() {
    let store = Arc::new(MemoryStore::new());
    let inventory = InventoryState::new(store.clone());

    inventory.add_product(widget());
    inventory.add_category("Toys");
    inventory.flush().await;

    assert_eq!(store.write_count(), 0);
    assert!(store.peek(PRODUCTS_KEY).is_none());
}

#[tokio::test]
async fn missing_key_keeps_pre_load_mutations() {
    let store = Arc::new(MemoryStore::new());
    let inventory = InventoryState::new(store);

    inventory.add_category("Toys");
    inventory.load().await;

    assert!(inventory.categories().contains("Toys"));
}

#[tokio::test]
async fn stored_values_replace_defaults() {
    let store = Arc::new(MemoryStore::with_entries([
        (PRODUCTS_KEY, "[]"),
        (CATEGORIES_KEY, r#"["Tools","Paint"]"#),
    ]));
    let inventory = loaded(store).await;

    let categories: Vec<_> = inventory.categories().to_vec();
    assert_eq!(categories, vec!["Tools", "Paint"]);
    assert!(!categories.iter().any(|c| DEFAULT_CATEGORIES.contains(&c.as_str())));
}

#[tokio::test]
async fn corrupt_products_do_not_block_categories() {
    let store = Arc::new(MemoryStore::with_entries([
        (PRODUCTS_KEY, "{not json"),
        (CATEGORIES_KEY, r#"["Tools","Paint"]"#),
    ]));
    let inventory = InventoryState::new(store);

    let report = inventory.load().await;

    assert!(report.products.is_failed());
    assert_eq!(report.categories, KeyLoad::Loaded { count: 2 });
    assert!(!report.is_clean());
    assert!(inventory.products().is_empty());
    assert_eq!(inventory.categories().len(), 2);
    assert!(!inventory.is_loading());
}

#[tokio::test]
async fn read_failure_falls_back_to_defaults() {
    let store = Arc::new(MemoryStore::with_entries([(CATEGORIES_KEY, r#"["Tools"]"#)]));
    store.fail_reads(true);
    let inventory = InventoryState::new(store);

    let report = inventory.load().await;

    assert!(report.products.is_failed());
    assert!(report.categories.is_failed());
    assert!(!inventory.is_loading());
    assert!(inventory.products().is_empty());
    assert_eq!(inventory.categories(), CategorySet::default());
}

// =============================================================================
// Persistence failures
// =============================================================================

#[tokio::test]
async fn failed_save_keeps_memory_state() {
    let store = Arc::new(MemoryStore::new());
    let inventory = loaded(store.clone()).await;

    store.fail_writes(true);
    inventory.add_product(widget());
    inventory.flush().await;

    assert_eq!(inventory.products().len(), 1);
    let stats = inventory.persist_stats();
    assert!(stats.writes_failed >= 1);
    assert!(stats.last_error.is_some());

    // The next successful save carries everything
    store.fail_writes(false);
    inventory.add_product(ProductDraft::new("Gadget", "Electronics", 20.0, 30, 5));
    inventory.flush().await;

    assert_eq!(stored_products(&store).len(), 2);
}

#[tokio::test]
async fn non_finite_price_never_reaches_the_store() {
    let store = Arc::new(MemoryStore::new());
    let inventory = loaded(store.clone()).await;

    let kept = inventory.add_product(widget());
    inventory.flush().await;

    inventory.add_product(ProductDraft::new("Broken", "Other", f64::NAN, 1, 1));
    inventory.add_category("Toys");
    inventory.flush().await;

    assert!(inventory.persist_stats().writes_failed >= 1);
    assert!(!store.peek(PRODUCTS_KEY).unwrap().contains("null"));

    // The last good snapshot still loads in full
    let reloaded = InventoryState::new(store.clone());
    let report = reloaded.load().await;
    assert_eq!(report.products, KeyLoad::Loaded { count: 1 });
    assert_eq!(reloaded.products(), vec![kept]);
}

#[tokio::test]
async fn mutations_after_shutdown_stay_in_memory() {
    let store = Arc::new(MemoryStore::new());
    let inventory = loaded(store.clone()).await;

    inventory.add_product(widget());
    inventory.shutdown().await;
    inventory.add_product(ProductDraft::new("Late", "Other", 1.0, 1, 1));
    inventory.flush().await;

    assert_eq!(inventory.products().len(), 2);
    assert_eq!(stored_products(&store).len(), 1);
}
