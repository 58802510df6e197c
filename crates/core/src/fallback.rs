//! Built-in dataset served when the store is unreachable and no cached
//! snapshot exists. Keeps the storefront rendering something meaningful
//! instead of an error page on a cold start.

use serde_json::json;

use crate::types::Product;

/// A small, always-available product list.
///
/// # Panics
///
/// Never panics: the embedded records are valid by construction and
/// covered by tests.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn fallback_products() -> Vec<Product> {
    serde_json::from_value(json!([
        {
            "id": 1,
            "name": "Toyota Camry 2020",
            "brand": "Toyota",
            "type": "sedan",
            "year": 2020,
            "mileage": 45_000,
            "transmission": "Automatic",
            "fuelType": "Gasoline",
            "engineSize": "2.5L",
            "price": 450_000.0,
            "newprice": 420_000.0,
            "colors": ["white", "silver"],
            "pictures": [
                "https://images.unsplash.com/photo-1621007947382-bb3c3994e3fb?w=800&h=600&fit=crop"
            ],
            "description": "Well-maintained Toyota Camry",
            "features": ["Cruise Control", "Bluetooth"]
        },
        {
            "id": 2,
            "name": "Honda CR-V 2019",
            "brand": "Honda",
            "type": "suv",
            "year": 2019,
            "mileage": 62_000,
            "transmission": "Automatic",
            "fuelType": "Gasoline",
            "engineSize": "1.5L",
            "price": 520_000.0,
            "colors": ["black"],
            "pictures": [
                "https://images.unsplash.com/photo-1568844293986-8d0400bd4745?w=800&h=600&fit=crop"
            ],
            "description": "Reliable family SUV",
            "features": ["Backup Camera", "Lane Assist"]
        }
    ]))
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_products_non_empty() {
        assert!(!fallback_products().is_empty());
    }

    #[test]
    fn test_fallback_products_have_lowercase_types_and_unique_ids() {
        let products = fallback_products();
        for product in &products {
            assert_eq!(product.kind, product.kind.to_lowercase());
        }
        let mut ids: Vec<_> = products.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), products.len());
    }
}
