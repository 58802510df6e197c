//! Motorlane storefront API server.
//!
//! Serves the public vehicle catalog out of an in-memory product cache and
//! exposes the admin write path plus the manual revalidation protocol that
//! publishes store changes to the public surface.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
