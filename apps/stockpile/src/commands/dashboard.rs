//! # Dashboard Commands
//!
//! The dashboard shows the four stat cards plus two alert lists.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Dashboard                                                      │
//! │  ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐            │
//! │  │ Products │ │  Value   │ │Low Stock │ │  Out of  │            │
//! │  │    12    │ │ $1234.50 │ │    3     │ │    1     │            │
//! │  └──────────┘ └──────────┘ └──────────┘ └──────────┘            │
//! │                                                                 │
//! │  Low stock alerts ........ low_stock                            │
//! │  Out of stock ............ out_of_stock                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use super::product::ProductDto;
use crate::state::{AppConfig, InventoryState};
use stockpile_core::InventoryStats;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub stats: InventoryStats,
    /// `stats.total_value` in the configured currency format.
    pub formatted_total_value: String,
    pub low_stock: Vec<ProductDto>,
    pub out_of_stock: Vec<ProductDto>,
    /// `true` while the initial load is still running.
    pub loading: bool,
}

/// Builds the dashboard from the current inventory.
pub fn get_dashboard(inventory: &InventoryState, config: &AppConfig) -> DashboardDto {
    let stats = inventory.stats();

    DashboardDto {
        formatted_total_value: config.format_currency(stats.total_value),
        stats,
        low_stock: inventory.low_stock_products().into_iter().map(ProductDto::from).collect(),
        out_of_stock: inventory.out_of_stock_products().into_iter().map(ProductDto::from).collect(),
        loading: inventory.is_loading(),
    }
}
