//! VerzendConnect Core - Shared types library.
//!
//! This crate provides common types used across the storefront client:
//! - `storefront` - Cart, search and widget controllers over the page model
//! - `cli` - Command-line driver for the cart and search endpoints
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no document access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, quantities and rental periods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
