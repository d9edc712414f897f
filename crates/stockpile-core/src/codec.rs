//! # Snapshot Codec
//!
//! JSON encoding of the two persisted collections. The store only ever sees
//! strings; this module is the single place that knows their shape.
//!
//! ```text
//!   "@products"   → [{"id":"…","name":"Widget","category":"Other",
//!                     "price":9.99,"quantity":5,"lowStockThreshold":10,
//!                     "createdAt":"2024-05-01T10:00:00Z"}, …]
//!   "@categories" → ["Electronics","Clothing","Food","Furniture","Other"]
//! ```

use crate::error::{CoreError, CoreResult};
use crate::types::{CategorySet, Product};
use crate::{CATEGORIES_KEY, PRODUCTS_KEY};

/// Encodes the product collection.
///
/// Fails if any price is NaN or infinite: serde_json would write `null`,
/// and the whole array would then be unreadable on the next load.
pub fn encode_products(products: &[Product]) -> CoreResult<String> {
    if let Some(bad) = products.iter().find(|p| !p.price.is_finite()) {
        return Err(CoreError::NonFinitePrice { id: bad.id.clone() });
    }

    serde_json::to_string(products).map_err(|source| CoreError::Serialization {
        key: PRODUCTS_KEY.to_string(),
        source,
    })
}

/// Decodes the product collection.
pub fn decode_products(raw: &str) -> CoreResult<Vec<Product>> {
    serde_json::from_str(raw).map_err(|source| CoreError::Serialization {
        key: PRODUCTS_KEY.to_string(),
        source,
    })
}

/// Encodes the category set as an array of strings.
pub fn encode_categories(categories: &CategorySet) -> CoreResult<String> {
    serde_json::to_string(categories).map_err(|source| CoreError::Serialization {
        key: CATEGORIES_KEY.to_string(),
        source,
    })
}

/// Decodes the category set.
pub fn decode_categories(raw: &str) -> CoreResult<CategorySet> {
    serde_json::from_str(raw).map_err(|source| CoreError::Serialization {
        key: CATEGORIES_KEY.to_string(),
        source,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductDraft;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_decode_products_from_stored_json() {
        let raw = r#"[{
            "id": "1714557600000",
            "name": "Widget",
            "category": "Other",
            "price": 9.99,
            "quantity": 5,
            "lowStockThreshold": 10,
            "description": "",
            "createdAt": "2024-05-01T10:00:00.000Z"
        }]"#;

        let products = decode_products(raw).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "1714557600000");
        assert_eq!(products[0].low_stock_threshold, 10);
        assert_eq!(products[0].description.as_deref(), Some(""));
    }

    #[test]
    fn test_decode_products_rejects_garbage() {
        let err = decode_products("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Serialization { ref key, .. } if key == PRODUCTS_KEY));
    }

    #[test]
    fn test_decode_categories_rejects_wrong_shape() {
        let err = decode_categories(r#"{"a":1}"#).unwrap_err();
        assert!(matches!(err, CoreError::Serialization { ref key, .. } if key == CATEGORIES_KEY));
    }

    #[test]
    fn test_encode_empty_products() {
        assert_eq!(encode_products(&[]).unwrap(), "[]");
    }

    fn priced(id: &str, price: f64) -> Product {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        Product::from_draft(id, ProductDraft::new("Widget", "Other", price, 1, 0), created)
    }

    #[test]
    fn test_full_precision_prices_survive_round_trip() {
        // xorshift64: a fixed spread of prices in [0, 10000) with all 53 bits used
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let products: Vec<Product> = (0..5_000)
            .map(|i| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let unit = (state >> 11) as f64 / (1u64 << 53) as f64;
                priced(&i.to_string(), unit * 10_000.0)
            })
            .collect();

        let decoded = decode_products(&encode_products(&products).unwrap()).unwrap();

        for (before, after) in products.iter().zip(&decoded) {
            assert_eq!(before.price.to_bits(), after.price.to_bits(), "price {}", before.price);
        }
        assert_eq!(decoded, products);
    }

    #[test]
    fn test_known_lossy_prices_round_trip() {
        let products = vec![priced("a", 1823.3521453552403), priced("b", 924.2132512813595)];

        let decoded = decode_products(&encode_products(&products).unwrap()).unwrap();
        assert_eq!(decoded, products);
    }

    #[test]
    fn test_encode_rejects_non_finite_price() {
        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let products = vec![priced("ok", 9.99), priced("bad", price)];

            let err = encode_products(&products).unwrap_err();
            assert!(matches!(err, CoreError::NonFinitePrice { ref id } if id == "bad"));
        }
    }
}
