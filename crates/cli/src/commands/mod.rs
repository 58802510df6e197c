//! CLI command implementations.

pub mod cache;
