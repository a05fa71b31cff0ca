//! Core types for the storefront client.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod quantity;
pub mod rental;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use quantity::{QuantityBounds, QuantityStep, parse_quantity};
pub use rental::{RentalPeriod, RentalPeriodError};
