//! # State Module
//!
//! Application state for Stockpile.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌──────────────────────────────────────────┐   │
//! │  │    AppConfig     │   │              InventoryState              │   │
//! │  │                  │   │                                          │   │
//! │  │  storage backend │   │  Arc<Mutex<Inventory>>                   │   │
//! │  │  currency format │   │    products / categories / loading       │   │
//! │  │  log filter      │   │                                          │   │
//! │  └──────────────────┘   │  PersistHandle ──► PersistWorker task    │   │
//! │                         │                        │                  │   │
//! │                         └────────────────────────┼──────────────────┘   │
//! │                                                  ▼                      │
//! │                                     Arc<dyn KeyValueStore>              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • InventoryState: Arc<Mutex<T>>, never held across an await           │
//! │  • AppConfig: Read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod inventory;
mod persist;

pub use config::{
    AppConfig, DisplaySettings, LoggingSettings, StorageBackend, StorageSettings,
    DEFAULT_LOG_FILTER,
};
pub use inventory::{InventoryState, KeyLoad, LoadReport};
pub use persist::{PersistHandle, PersistStats, PersistWorker, Snapshot};
