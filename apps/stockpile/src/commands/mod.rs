//! # Commands Module
//!
//! Everything the presentation layer calls.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── product.rs    ◄─── Product list, lookup, CRUD
//! ├── category.rs   ◄─── Category list and creation
//! └── dashboard.rs  ◄─── Stats and stock alerts
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Screen submits a form                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  create_product(&inventory, ProductForm { price: "9.99", .. })          │
//! │         │                                                               │
//! │         ├── validate_product_form ──► Err(ApiError VALIDATION_ERROR)    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  InventoryState::add_product(draft)                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Ok(ProductDto)  (camelCase JSON)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take the state they need by reference and return
//! `Result<Dto, ApiError>`. None of them await: the inventory is in memory
//! and persistence happens in the background.

pub mod category;
pub mod dashboard;
pub mod product;
