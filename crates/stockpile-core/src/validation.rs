//! # Validation Module
//!
//! Input validation for the add/edit product form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation (mobile UI)                                     │
//! │  └── Collects raw text: name, price, quantity, threshold, ...          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commands (stockpile-app)                                     │
//! │  └── THIS MODULE: trims, parses and checks the form → ProductDraft     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: InventoryState                                                │
//! │  └── Stores whatever draft it is given (no checks)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockpile_core::validation::{validate_product_form, ProductForm};
//! use stockpile_core::CategorySet;
//!
//! let form = ProductForm {
//!     name: "  Widget ".into(),
//!     category: "Other".into(),
//!     price: "9.99".into(),
//!     quantity: "5".into(),
//!     low_stock_threshold: "10".into(),
//!     description: String::new(),
//! };
//!
//! let draft = validate_product_form(&form, &CategorySet::default()).unwrap();
//! assert_eq!(draft.name, "Widget");
//! assert_eq!(draft.description, None);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{CategorySet, Product, ProductDraft};
use crate::ALL_CATEGORIES_LABEL;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name.
pub const MAX_NAME_LEN: usize = 100;

/// Longest accepted category name.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Longest accepted search query.
pub const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// Product Form
// =============================================================================

/// Raw product form as typed by the user. Every field is text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub quantity: String,
    pub low_stock_threshold: String,
    #[serde(default)]
    pub description: String,
}

impl ProductForm {
    /// Pre-fills the form from an existing product (edit flow).
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            quantity: product.quantity.to_string(),
            low_stock_threshold: product.low_stock_threshold.to_string(),
            description: product.description.clone().unwrap_or_default(),
        }
    }
}

/// Validates every field of the form and builds a draft.
///
/// Fields are checked in form order; the first failure is returned.
pub fn validate_product_form(
    form: &ProductForm,
    categories: &CategorySet,
) -> ValidationResult<ProductDraft> {
    let name = validate_product_name(&form.name)?;
    let category = validate_category(&form.category, categories)?;
    let price = parse_price(&form.price)?;
    let quantity = parse_count("quantity", &form.quantity)?;
    let low_stock_threshold = parse_count("lowStockThreshold", &form.low_stock_threshold)?;

    Ok(ProductDraft {
        name,
        category,
        price,
        quantity,
        low_stock_threshold,
        description: normalize_description(&form.description),
    })
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 100 characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Checks that `category` is one of the known categories.
pub fn validate_category(category: &str, categories: &CategorySet) -> ValidationResult<String> {
    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if !categories.contains(category) {
        return Err(ValidationError::UnknownCategory(category.to_string()));
    }

    Ok(category.to_string())
}

/// Validates a category name typed into the "new category" box.
///
/// ## Rules
/// - Trimmed, must not be empty
/// - At most 50 characters
/// - Not `"All"`, which the category filter reads as "no filter"
pub fn validate_new_category(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if name == ALL_CATEGORIES_LABEL {
        return Err(ValidationError::ReservedCategory(name.to_string()));
    }

    if name.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(name.to_string())
}

/// Trims a description; blank becomes `None`.
pub fn normalize_description(description: &str) -> Option<String> {
    let description = description.trim();
    if description.is_empty() {
        None
    } else {
        Some(description.to_string())
    }
}

/// Validates a search query.
///
/// The text is kept as typed, surrounding spaces included, since they take
/// part in the substring match. Empty is allowed (matches everything).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Parses a price.
///
/// ## Rules
/// - Required
/// - Must parse as a finite decimal
/// - Must be greater than zero
pub fn parse_price(raw: &str) -> ValidationResult<f64> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    let price: f64 = raw.parse().map_err(|_| ValidationError::InvalidNumber {
        field: "price".to_string(),
        value: raw.to_string(),
    })?;

    if !price.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: "price".to_string(),
            value: raw.to_string(),
        });
    }

    if price <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(price)
}

/// Parses a non-negative whole number (quantity, threshold).
///
/// ## Rules
/// - Required
/// - Must parse as an integer
/// - Must be between 0 and `u32::MAX`
pub fn parse_count(field: &str, raw: &str) -> ValidationResult<u32> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value: i64 = raw.parse().map_err(|_| ValidationError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    })?;

    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
