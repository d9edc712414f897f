//! # Domain Types
//!
//! Core domain types used throughout Stockpile.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────┐   ┌─────────────────┐   │
//! │  │      Product        │   │  ProductDraft   │   │   CategorySet   │   │
//! │  │  ─────────────────  │   │  ─────────────  │   │  ─────────────  │   │
//! │  │  id (UUID)          │   │  (no id)        │   │  ordered,       │   │
//! │  │  name, category     │◄──│  name, category │   │  unique names   │   │
//! │  │  price, quantity    │   │  price, qty     │   │                 │   │
//! │  │  lowStockThreshold  │   │  threshold      │   │  Electronics    │   │
//! │  │  createdAt          │   │  description    │   │  Clothing ...   │   │
//! │  └─────────────────────┘   └─────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐                         │
//! │  │  StockStatus    │   │  InventoryStats     │                         │
//! │  │  ─────────────  │   │  ─────────────────  │                         │
//! │  │  InStock        │   │  totalProducts      │                         │
//! │  │  LowStock       │   │  totalValue         │                         │
//! │  │  OutOfStock     │   │  lowStockItems      │                         │
//! │  └─────────────────┘   │  outOfStock         │                         │
//! │                        └─────────────────────┘                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Every type serializes with camelCase field names (`lowStockThreshold`,
//! `createdAt`) so snapshots written by earlier clients load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DEFAULT_CATEGORIES;

// =============================================================================
// Product
// =============================================================================

/// A product tracked in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier, immutable once assigned.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Category name (one of the category set at creation time).
    pub category: String,

    /// Unit price (non-negative decimal).
    pub price: f64,

    /// Units on hand.
    pub quantity: u32,

    /// At or below this quantity the product counts as low stock.
    pub low_stock_threshold: u32,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the product was created. Never changes afterwards.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from a draft plus the identity fields the
    /// inventory assigns.
    pub fn from_draft(
        id: impl Into<String>,
        draft: ProductDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Product {
            id: id.into(),
            name: draft.name,
            category: draft.category,
            price: draft.price,
            quantity: draft.quantity,
            low_stock_threshold: draft.low_stock_threshold,
            description: draft.description,
            created_at,
        }
    }

    /// Replaces every editable field with the draft's values.
    ///
    /// `id` and `created_at` are left untouched.
    pub fn apply_draft(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.category = draft.category;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.low_stock_threshold = draft.low_stock_threshold;
        self.description = draft.description;
    }

    /// Value of the units on hand (`price × quantity`).
    #[inline]
    pub fn total_value(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// `quantity == 0`.
    #[inline]
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// `0 < quantity <= low_stock_threshold`.
    ///
    /// Out-of-stock products are never low stock.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity > 0 && self.quantity <= self.low_stock_threshold
    }

    /// Stock status for display. Out of stock takes precedence.
    pub fn stock_status(&self) -> StockStatus {
        if self.is_out_of_stock() {
            StockStatus::OutOfStock
        } else if self.is_low_stock() {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// =============================================================================
// Product Draft
// =============================================================================

/// The caller-supplied part of a product: everything except `id` and
/// `createdAt`.
///
/// The inventory stores drafts as given; it performs no validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub low_stock_threshold: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProductDraft {
    /// Creates a draft without a description.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        quantity: u32,
        low_stock_threshold: u32,
    ) -> Self {
        ProductDraft {
            name: name.into(),
            category: category.into(),
            price,
            quantity,
            low_stock_threshold,
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// =============================================================================
// Stock Status
// =============================================================================

/// Stock level classification of a single product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StockStatus {
    /// Quantity above the low-stock threshold.
    InStock,
    /// `0 < quantity <= threshold`.
    LowStock,
    /// `quantity == 0`.
    OutOfStock,
}

impl StockStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Category Set
// =============================================================================

/// Ordered set of unique category names.
///
/// ## Invariants
/// - Names are unique (case-sensitive exact match)
/// - Insertion order is preserved
/// - Nothing is ever removed or renamed
///
/// Serializes as a plain JSON array of strings. Duplicates in stored data
/// are dropped on load, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    /// An empty set (no defaults).
    pub fn empty() -> Self {
        CategorySet { names: Vec::new() }
    }

    /// Adds `name` unless it is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.names.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// The five default categories.
impl Default for CategorySet {
    fn default() -> Self {
        CategorySet::from(
            DEFAULT_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
        )
    }
}

impl From<Vec<String>> for CategorySet {
    fn from(names: Vec<String>) -> Self {
        let mut set = CategorySet::empty();
        for name in names {
            set.insert(name);
        }
        set
    }
}

impl From<CategorySet> for Vec<String> {
    fn from(set: CategorySet) -> Self {
        set.names
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

// =============================================================================
// Inventory Stats
// =============================================================================

/// Dashboard statistics. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryStats {
    /// Number of products.
    pub total_products: usize,
    /// Σ price × quantity.
    pub total_value: f64,
    /// Products with `0 < quantity <= threshold`.
    pub low_stock_items: usize,
    /// Products with `quantity == 0`.
    pub out_of_stock: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================
