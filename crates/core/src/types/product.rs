//! The `Product` record and its write payloads.
//!
//! Field names follow the wire format of the `products` table, so the same
//! types serve as store rows, API responses, and request bodies. The
//! `color_images` object is the source of truth for both `colors` and
//! `pictures`: whenever a write payload carries it, both derived fields are
//! recomputed from it and never trusted independently.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::id::ProductId;

/// Mapping from color name to an ordered list of image URLs.
///
/// `serde_json` is built with `preserve_order`, so key iteration order is
/// the insertion order of the incoming JSON object. That order is
/// semantic: it becomes the display order of `colors` and `pictures`.
pub type ColorImages = Map<String, Value>;

/// Validation failure on a write payload, detected before any I/O.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field is out of range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// `color_images` is not a map of color -> array of URL strings.
    #[error("invalid color_images: {0}")]
    InvalidColorImages(String),
}

/// A single catalog entry.
///
/// Only `id`, `name`, `price`, and `type` are interpreted by the catalog
/// layer; the remaining attributes are carried through for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    /// Optional sale price; the product is on sale when `0 < newprice < price`.
    #[serde(default)]
    pub newprice: Option<f64>,
    /// Category tag. Lowercased by the cache on every load; the persisted
    /// record keeps its original casing.
    #[serde(rename = "type", default, deserialize_with = "null_to_empty")]
    pub kind: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub mileage: Option<i64>,
    #[serde(default)]
    pub transmission: Option<String>,
    #[serde(rename = "fuelType", default)]
    pub fuel_type: Option<String>,
    #[serde(rename = "engineSize", default)]
    pub engine_size: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub color_images: Option<ColorImages>,
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(default)]
    pub sizes: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Product {
    /// Whether the sale price is active (`0 < newprice < price`).
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.newprice
            .is_some_and(|newprice| newprice > 0.0 && newprice < self.price)
    }

    /// Lowercase the category tag (case-insensitive category identity).
    pub fn normalize_kind(&mut self) {
        if self.kind.chars().any(char::is_uppercase) {
            self.kind = self.kind.to_lowercase();
        }
    }
}

/// Tolerate explicit `null` for the category column.
fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload for creating a product. The store assigns the `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newprice: Option<f64>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(rename = "fuelType", default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(rename = "engineSize", default, skip_serializing_if = "Option::is_none")]
    pub engine_size: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_images: Option<ColorImages>,
    #[serde(default)]
    pub pictures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ProductInput {
    /// Check required fields. Runs before any store call.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when `name` or `type` is empty, `price`
    /// is not positive, or `newprice` is present but not positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.kind.trim().is_empty() {
            return Err(ValidationError::MissingField("type"));
        }
        if self.price <= 0.0 {
            return Err(ValidationError::InvalidField {
                field: "price",
                reason: format!("must be positive, got {}", self.price),
            });
        }
        if let Some(newprice) = self.newprice
            && newprice <= 0.0
        {
            return Err(ValidationError::InvalidField {
                field: "newprice",
                reason: format!("must be positive, got {newprice}"),
            });
        }
        Ok(())
    }

    /// Recompute `colors` and `pictures` from `color_images` when present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidColorImages` when a value is not an
    /// array of strings.
    pub fn derive_color_images(&mut self) -> Result<(), ValidationError> {
        if let Some(map) = &self.color_images {
            let (colors, pictures) = derive_from_color_images(map)?;
            self.colors = colors;
            self.pictures = pictures;
        }
        Ok(())
    }
}

/// Payload for updating a product: a shallow field replace. Only fields
/// present in the patch are sent to the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub newprice: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(rename = "fuelType", default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(rename = "engineSize", default, skip_serializing_if = "Option::is_none")]
    pub engine_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_images: Option<ColorImages>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pictures: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

impl ProductPatch {
    /// Check updated fields. Runs before any store call.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when a provided field fails the same
    /// checks applied on create.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::MissingField("name"));
        }
        if self.kind.as_deref().is_some_and(|k| k.trim().is_empty()) {
            return Err(ValidationError::MissingField("type"));
        }
        if let Some(price) = self.price
            && price <= 0.0
        {
            return Err(ValidationError::InvalidField {
                field: "price",
                reason: format!("must be positive, got {price}"),
            });
        }
        if let Some(newprice) = self.newprice
            && newprice <= 0.0
        {
            return Err(ValidationError::InvalidField {
                field: "newprice",
                reason: format!("must be positive, got {newprice}"),
            });
        }
        Ok(())
    }

    /// Recompute `colors` and `pictures` from `color_images` when present.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidColorImages` when a value is not an
    /// array of strings.
    pub fn derive_color_images(&mut self) -> Result<(), ValidationError> {
        if let Some(map) = &self.color_images {
            let (colors, pictures) = derive_from_color_images(map)?;
            self.colors = Some(colors);
            self.pictures = Some(pictures);
        }
        Ok(())
    }
}

/// `colors = keys(color_images)`, `pictures = flatten(values(color_images))`,
/// both in the map's key iteration order.
fn derive_from_color_images(
    map: &ColorImages,
) -> Result<(Vec<String>, Vec<String>), ValidationError> {
    let mut colors = Vec::with_capacity(map.len());
    let mut pictures = Vec::new();

    for (color, value) in map {
        let urls = value.as_array().ok_or_else(|| {
            ValidationError::InvalidColorImages(format!(
                "images for color '{color}' must be an array"
            ))
        })?;
        colors.push(color.clone());
        for url in urls {
            let url = url.as_str().ok_or_else(|| {
                ValidationError::InvalidColorImages(format!(
                    "image entry for color '{color}' must be a string URL"
                ))
            })?;
            pictures.push(url.to_string());
        }
    }

    Ok((colors, pictures))
}
