//! # Stockpile App Library
//!
//! In-memory inventory state, its background persistence, and the commands
//! the presentation layer calls.
//!
//! ## Module Organization
//! ```text
//! stockpile_app/
//! ├── lib.rs            ◄─── You are here (startup)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── inventory.rs  ◄─── InventoryState (products, categories, loading)
//! │   ├── persist.rs    ◄─── Write-behind snapshot worker
//! │   └── config.rs     ◄─── AppConfig (TOML + env)
//! ├── commands/
//! │   ├── mod.rs        ◄─── Command exports
//! │   ├── product.rs    ◄─── Product list/CRUD
//! │   ├── category.rs   ◄─── Category list/add
//! │   └── dashboard.rs  ◄─── Stats and stock alerts
//! └── error.rs          ◄─── ApiError, ConfigError, StartupError
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Load Configuration ───────────────────────────────────────────────► │
//! │     • config.toml, then STOCKPILE_* env overrides                       │
//! │     • logged through a scoped stderr subscriber                         │
//! │                                                                         │
//! │  2. Initialize Logging ───────────────────────────────────────────────► │
//! │     • RUST_LOG wins, else the configured filter                         │
//! │                                                                         │
//! │  3. Open Store ───────────────────────────────────────────────────────► │
//! │     • SQLite (WAL, migrations) or in-memory                             │
//! │                                                                         │
//! │  4. Create InventoryState ────────────────────────────────────────────► │
//! │     • Defaults + loading = true, persist worker spawned                 │
//! │                                                                         │
//! │  5. Load ─────────────────────────────────────────────────────────────► │
//! │     • "@products" / "@categories" replace defaults when present        │
//! │     • loading = false; saves start flowing                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use stockpile_store::{KeyValueStore, MemoryStore, SqliteStore, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use error::{ConfigError, StartupError};
use state::{AppConfig, InventoryState, StorageBackend, DEFAULT_LOG_FILTER};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stockpile_app=trace` - Trace the app crate only
/// - Default: `default_filter` (from [`AppConfig::log_filter`])
///
/// Calling it twice is harmless; the second call is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads configuration before the global subscriber exists.
///
/// A scoped stderr subscriber (`RUST_LOG`, else the built-in default
/// filter) is active during the load, so the config source messages are
/// not lost.
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    load_config_with(config_path, filter, std::io::stderr)
}

fn load_config_with<W>(
    config_path: Option<PathBuf>,
    filter: EnvFilter,
    writer: W,
) -> Result<AppConfig, ConfigError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();

    tracing::subscriber::with_default(bootstrap, || AppConfig::load(config_path))
}

/// Opens the store selected by `config`.
///
/// For SQLite the parent directory of the database file is created if
/// needed.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, StartupError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; nothing survives a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let path = config.database_path()?;
            if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir).map_err(|source| StartupError::DataDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }

            info!(?path, "Opening SQLite store");
            let store_config =
                StoreConfig::new(path).max_connections(config.storage.max_connections);
            let store = SqliteStore::new(store_config).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Opens the store and loads the inventory from it.
///
/// Load failures are not fatal: the affected collection keeps its defaults
/// and the failure is logged.
pub async fn start(config: &AppConfig) -> Result<InventoryState, StartupError> {
    let store = open_store(config).await?;
    let inventory = InventoryState::new(store);

    let report = inventory.load().await;
    if !report.is_clean() {
        warn!(?report, "Inventory loaded with errors; defaults kept for failed keys");
    }

    Ok(inventory)
}

/// Runs a headless session: start, report the dashboard, then shut down
/// cleanly so every pending save reaches the store.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    info!(backend = %config.storage.backend, "Starting Stockpile");

    let inventory = start(&config).await?;

    let dashboard = commands::dashboard::get_dashboard(&inventory, &config);
    info!(
        products = dashboard.stats.total_products,
        total_value = %dashboard.formatted_total_value,
        low_stock = dashboard.stats.low_stock_items,
        out_of_stock = dashboard.stats.out_of_stock,
        categories = inventory.categories().len(),
        "Inventory ready"
    );
    for product in &dashboard.low_stock {
        info!(
            name = %product.name,
            quantity = product.quantity,
            threshold = product.low_stock_threshold,
            "Low stock"
        );
    }
    for product in &dashboard.out_of_stock {
        warn!(name = %product.name, "Out of stock");
    }

    inventory.shutdown().await;
    info!(persist = ?inventory.persist_stats(), "Stockpile stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Collects log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_config_load_messages_are_logged() {
        let path = std::env::temp_dir()
            .join(format!("stockpile-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[display]\ncurrency_symbol = \"€\"\n").unwrap();

        let captured = Captured::default();
        let sink = captured.clone();
        let config =
            load_config_with(Some(path.clone()), EnvFilter::new("debug"), move || sink.clone());
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.unwrap().display.currency_symbol, "€");
        assert!(captured.text().contains("Loading config from file"), "{}", captured.text());
    }
}
