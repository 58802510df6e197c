//! Core types for Motorlane.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod product;

pub use category::{Category, fallback_categories};
pub use id::*;
pub use product::{Product, ProductInput, ProductPatch, ValidationError};
