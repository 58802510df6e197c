//! Integration tests for Motorlane.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server against a test Supabase project
//! cargo run -p motorlane-server
//!
//! # Run integration tests (ignored by default)
//! cargo test -p motorlane-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - Public read endpoints
//! - `publish_cycle` - Write path plus manual revalidation

#![cfg_attr(not(test), forbid(unsafe_code))]
