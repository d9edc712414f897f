//! # Inventory Statistics
//!
//! Derived dashboard figures. Everything here is a pure function of a
//! product slice; nothing is cached, so results always reflect the slice
//! they are given.
//!
//! ## Stock Classification
//! ```text
//!   quantity == 0                    → out of stock
//!   0 < quantity <= lowStockThreshold → low stock
//!   quantity >  lowStockThreshold     → in stock
//! ```

use crate::types::{InventoryStats, Product};

/// Computes the dashboard statistics for `products`.
///
/// ## Example
/// ```rust
/// use stockpile_core::stats::compute_stats;
///
/// let stats = compute_stats(&[]);
/// assert_eq!(stats.total_products, 0);
/// assert_eq!(stats.total_value, 0.0);
/// ```
pub fn compute_stats(products: &[Product]) -> InventoryStats {
    products.iter().fold(InventoryStats::default(), |mut acc, p| {
        acc.total_products += 1;
        acc.total_value += p.total_value();
        if p.is_low_stock() {
            acc.low_stock_items += 1;
        }
        if p.is_out_of_stock() {
            acc.out_of_stock += 1;
        }
        acc
    })
}

/// Products with `0 < quantity <= lowStockThreshold`, in collection order.
pub fn low_stock(products: &[Product]) -> Vec<Product> {
    products.iter().filter(|p| p.is_low_stock()).cloned().collect()
}

/// Products with `quantity == 0`, in collection order.
pub fn out_of_stock(products: &[Product]) -> Vec<Product> {
    products.iter().filter(|p| p.is_out_of_stock()).cloned().collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
