//! # Product Queries
//!
//! Search, category filter and sorting for the product list.
//!
//! ## Query Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products (collection order)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  name contains search (case-insensitive)   ← empty search matches all  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  category == filter                        ← "All" matches all         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  stable sort by key/direction              ← no sort keeps order       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{CategorySet, Product};
use crate::ALL_CATEGORIES_LABEL;

// =============================================================================
// Category Filter
// =============================================================================

/// Which categories a query matches.
///
/// Serializes as a plain string; `"All"` is the wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// Exactly this category.
    Named(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        CategoryFilter::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        match filter {
            CategoryFilter::All => ALL_CATEGORIES_LABEL.to_string(),
            CategoryFilter::Named(name) => name,
        }
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Field to sort the product list by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SortKey {
    /// Case-insensitive name.
    Name,
    Price,
    Quantity,
    CreatedAt,
    /// price × quantity.
    TotalValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort key plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SortOrder {
    pub key: SortKey,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(key: SortKey) -> Self {
        SortOrder {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: SortKey) -> Self {
        SortOrder {
            key,
            direction: SortDirection::Desc,
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Price => a.price.total_cmp(&b.price),
            SortKey::Quantity => a.quantity.cmp(&b.quantity),
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::TotalValue => a.total_value().total_cmp(&b.total_value()),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

// =============================================================================
// Product Query
// =============================================================================

/// A product-list query as issued by the list screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name.
    #[serde(default)]
    pub search: String,

    #[serde(default)]
    pub category: CategoryFilter,

    /// `None` keeps collection (insertion) order.
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

impl ProductQuery {
    /// Matches every product, in collection order.
    pub fn all() -> Self {
        ProductQuery::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    pub fn category(mut self, filter: impl Into<CategoryFilter>) -> Self {
        self.category = filter.into();
        self
    }

    pub fn sort_by(mut self, order: SortOrder) -> Self {
        self.sort = Some(order);
        self
    }

    /// Whether a single product passes the search and category filter.
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search.to_lowercase();
        let name_matches = needle.is_empty() || product.name.to_lowercase().contains(&needle);
        name_matches && self.category.matches(&product.category)
    }

    /// Runs the query, returning owned copies of the matching products.
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let mut matched: Vec<Product> =
            products.iter().filter(|p| self.matches(p)).cloned().collect();
        if let Some(order) = self.sort {
            // Vec::sort_by is stable: ties keep collection order.
            matched.sort_by(|a, b| order.compare(a, b));
        }
        matched
    }
}

// =============================================================================
// Category Counts
// =============================================================================

/// Number of products per category, in category-set order, preceded by the
/// `"All"` total. Categories with no products are listed with zero.
///
/// Products whose category is not in the set only count toward `"All"`.
pub fn category_counts(products: &[Product], categories: &CategorySet) -> Vec<(String, usize)> {
    let mut counts = Vec::with_capacity(categories.len() + 1);
    counts.push((ALL_CATEGORIES_LABEL.to_string(), products.len()));
    for name in categories {
        let count = products.iter().filter(|p| &p.category == name).count();
        counts.push((name.clone(), count));
    }
    counts
}

// =============================================================================
// Unit Tests
// =============================================================================
