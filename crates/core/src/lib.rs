//! Motorlane Core - Shared types library.
//!
//! This crate provides the domain types used across all Motorlane
//! components:
//!
//! - `server` - JSON API backed by the remote product store
//! - `cli` - Command-line tools for the publish workflow
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - `Product`, write payloads, categories, and type-safe IDs
//! - [`fallback`] - Built-in dataset served when the store is unreachable

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fallback;
pub mod types;

pub use types::*;
