//! # Category Commands
//!
//! Category chips on the list screen and the "new category" box on the
//! product form.

use serde::Serialize;

use crate::error::ApiError;
use crate::state::InventoryState;
use stockpile_core::validation::validate_new_category;

/// One category chip: its name and how many products use it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub name: String,
    pub count: usize,
}

/// Lists `"All"` followed by every category, with product counts.
pub fn list_categories(inventory: &InventoryState) -> Vec<CategoryDto> {
    inventory
        .category_counts()
        .into_iter()
        .map(|(name, count)| CategoryDto { name, count })
        .collect()
}

/// Adds a category typed by the user and returns the full category list.
///
/// An existing name is accepted silently; the list comes back unchanged.
pub fn add_category(inventory: &InventoryState, name: &str) -> Result<Vec<String>, ApiError> {
    let name = validate_new_category(name)?;
    inventory.add_category(name);
    Ok(inventory.categories().to_vec())
}
