//! # Product Commands
//!
//! Product list, lookup and CRUD.
//!
//! ## List Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product List Flow                                    │
//! │                                                                         │
//! │  User types "lap" and taps the "Electronics" chip                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  list_products({ search: "lap", category: "Electronics" })              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_search_query ──► ≤ 100 chars, kept as typed                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ProductQuery::apply ──► name contains (case-insensitive)               │
//! │                          AND category matches                           │
//! │                          THEN optional sort                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ProductDto> (with stockStatus + totalValue precomputed)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::InventoryState;
use stockpile_core::validation::{validate_product_form, validate_search_query, ProductForm};
use stockpile_core::{
    CategoryFilter, CoreError, CoreResult, Product, ProductQuery, SortOrder, StockStatus,
};

/// Product as shown on the list and detail screens.
///
/// Carries the derived stock status and line value so the screen does not
/// recompute them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub low_stock_threshold: u32,
    pub description: Option<String>,
    /// RFC 3339.
    pub created_at: String,
    pub stock_status: StockStatus,
    /// price × quantity.
    pub total_value: f64,
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto {
            stock_status: p.stock_status(),
            total_value: p.total_value(),
            created_at: p.created_at.to_rfc3339(),
            id: p.id,
            name: p.name,
            category: p.category,
            price: p.price,
            quantity: p.quantity,
            low_stock_threshold: p.low_stock_threshold,
            description: p.description,
        }
    }
}

/// Parameters of [`list_products`]. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsRequest {
    #[serde(default)]
    pub search: Option<String>,
    /// Category name, or `"All"`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort: Option<SortOrder>,
}

/// Lists products matching the search text and category filter.
pub fn list_products(
    inventory: &InventoryState,
    request: ListProductsRequest,
) -> Result<Vec<ProductDto>, ApiError> {
    let search = match request.search.as_deref() {
        Some(raw) => validate_search_query(raw)?,
        None => String::new(),
    };

    let query = ProductQuery {
        search,
        category: request.category.map(CategoryFilter::from).unwrap_or_default(),
        sort: request.sort,
    };

    let products = inventory.query(&query);
    debug!(search = %query.search, results = products.len(), "list_products");

    Ok(products.into_iter().map(ProductDto::from).collect())
}

fn find_product(inventory: &InventoryState, id: &str) -> CoreResult<Product> {
    inventory
        .product(id)
        .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
}

/// Gets a single product by id.
pub fn get_product(inventory: &InventoryState, id: &str) -> Result<ProductDto, ApiError> {
    Ok(find_product(inventory, id)?.into())
}

/// Validates the add form and creates the product.
pub fn create_product(
    inventory: &InventoryState,
    form: ProductForm,
) -> Result<ProductDto, ApiError> {
    let draft = validate_product_form(&form, &inventory.categories())?;
    Ok(inventory.add_product(draft).into())
}

/// Validates the edit form and replaces product `id`'s editable fields.
///
/// A product edited from another screen in the meantime is overwritten.
pub fn update_product(
    inventory: &InventoryState,
    id: &str,
    form: ProductForm,
) -> Result<ProductDto, ApiError> {
    let draft = validate_product_form(&form, &inventory.categories())?;

    if !inventory.update_product(id, draft) {
        return Err(CoreError::ProductNotFound(id.to_string()).into());
    }
    get_product(inventory, id)
}

/// Deletes product `id`.
pub fn delete_product(inventory: &InventoryState, id: &str) -> Result<(), ApiError> {
    if inventory.delete_product(id) {
        Ok(())
    } else {
        Err(CoreError::ProductNotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::sync::Arc;
    use stockpile_core::SortKey;
    use stockpile_store::MemoryStore;

    async fn inventory() -> InventoryState {
        let inventory = InventoryState::new(Arc::new(MemoryStore::new()));
        inventory.load().await;
        inventory
    }

    fn form(name: &str, category: &str, price: &str, quantity: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            category: category.to_string(),
            price: price.to_string(),
            quantity: quantity.to_string(),
            low_stock_threshold: "10".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_product_from_form() {
        let inventory = inventory().await;

        let dto = create_product(&inventory, form("  Widget ", "Other", "9.99", "5")).unwrap();

        assert_eq!(dto.name, "Widget");
        assert_eq!(dto.stock_status, StockStatus::LowStock);
        assert!((dto.total_value - 49.95).abs() < 1e-9);
        assert_eq!(dto.description, None);
        assert_eq!(inventory.products().len(), 1);
    }

    #[tokio::test]
    async fn test_create_product_rejects_bad_price() {
        let inventory = inventory().await;

        let err = create_product(&inventory, form("Widget", "Other", "free", "5")).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("price"));
        assert!(inventory.products().is_empty());
    }

    #[tokio::test]
    async fn test_create_product_rejects_unknown_category() {
        let inventory = inventory().await;

        let err = create_product(&inventory, form("Widget", "Toys", "1", "5")).unwrap_err();
        assert_eq!(err.field.as_deref(), Some("category"));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let inventory = inventory().await;

        let err =
            update_product(&inventory, "nope", form("Widget", "Other", "1", "1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = delete_product(&inventory, "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_get_product_unknown_id() {
        let inventory = inventory().await;

        let err = get_product(&inventory, "nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Product not found: nope");
    }

    #[tokio::test]
    async fn test_update_product_round_trip() {
        let inventory = inventory().await;
        let created = create_product(&inventory, form("Widget", "Other", "1", "1")).unwrap();

        let edit = form("Widget Pro", "Electronics", "2.50", "40");
        let updated = update_product(&inventory, &created.id, edit).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.category, "Electronics");
        assert_eq!(updated.stock_status, StockStatus::InStock);
    }

    #[tokio::test]
    async fn test_list_products_filters_and_sorts() {
        let inventory = inventory().await;
        create_product(&inventory, form("Desk Lamp", "Furniture", "30", "4")).unwrap();
        create_product(&inventory, form("Laptop", "Electronics", "900", "2")).unwrap();
        create_product(&inventory, form("Lamp Shade", "Furniture", "12", "9")).unwrap();

        let lamps = list_products(
            &inventory,
            ListProductsRequest {
                search: Some("LAMP".to_string()),
                category: Some("Furniture".to_string()),
                sort: Some(SortOrder::asc(SortKey::Price)),
            },
        )
        .unwrap();

        let names: Vec<_> = lamps.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Lamp Shade", "Desk Lamp"]);

        let everything = list_products(&inventory, ListProductsRequest::default()).unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[tokio::test]
    async fn test_list_products_rejects_long_search() {
        let inventory = inventory().await;

        let request = ListProductsRequest {
            search: Some("x".repeat(101)),
            ..Default::default()
        };
        let err = list_products(&inventory, request).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_dto_serializes_camel_case() {
        let product = Product::from_draft(
            "p-1",
            stockpile_core::ProductDraft::new("Widget", "Other", 2.0, 0, 3),
            chrono::Utc::now(),
        );
        let json = serde_json::to_value(ProductDto::from(product)).unwrap();

        assert_eq!(json["lowStockThreshold"], 3);
        assert_eq!(json["stockStatus"], "out_of_stock");
        assert_eq!(json["totalValue"], 0.0);
    }
}
