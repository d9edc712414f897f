//! # stockpile-core: Pure Inventory Logic for Stockpile
//!
//! This crate is the **heart** of Stockpile. It contains the inventory
//! domain as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockpile Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Presentation Layer (mobile UI)                   │   │
//! │  │   Dashboard ──► Product List ──► Add / Edit Product             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stockpile-app (InventoryState + commands)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockpile-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   stats   │  │   query   │  │ validation│  │   │
//! │  │   │  Product  │  │  totals   │  │  search   │  │   form    │  │   │
//! │  │   │ Category  │  │ low stock │  │ filter    │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO CLOCK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              stockpile-store (Persistent Store)                 │   │
//! │  │              key-value: "@products", "@categories"              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductDraft, CategorySet, ...)
//! - [`stats`] - Derived dashboard statistics
//! - [`query`] - Search, category filter and sorting
//! - [`codec`] - JSON encoding of persisted snapshots
//! - [`error`] - Domain error types
//! - [`validation`] - Product form validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use stockpile_core::{stats, Product, ProductDraft};
//!
//! let draft = ProductDraft::new("Widget", "Other", 9.99, 5, 10);
//! let product = Product::from_draft("p-1", draft, Utc::now());
//!
//! let snapshot = stats::compute_stats(&[product]);
//! assert_eq!(snapshot.total_products, 1);
//! assert_eq!(snapshot.low_stock_items, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod query;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use query::{CategoryFilter, ProductQuery, SortDirection, SortKey, SortOrder};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store key holding the serialized product collection.
pub const PRODUCTS_KEY: &str = "@products";

/// Store key holding the serialized category collection.
pub const CATEGORIES_KEY: &str = "@categories";

/// Categories every fresh inventory starts with, in display order.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Electronics", "Clothing", "Food", "Furniture", "Other"];

/// Label of the pseudo-category that matches every product.
pub const ALL_CATEGORIES_LABEL: &str = "All";
