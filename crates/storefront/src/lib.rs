//! VerzendConnect storefront interaction layer.
//!
//! Cart mutations, live product search, notification banners and the small
//! page widgets (dropdowns, mobile menu, quantity stepper, image gallery),
//! running against an in-memory page model so every behavior can be driven
//! and tested without a browser.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verzend_storefront::{Event, HttpApi, Page, Storefront, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let api = Arc::new(HttpApi::from_config(&config)?);
//! let app = Storefront::init(Page::default(), api, &config);
//!
//! app.cart().add(product_id, 1).await;
//! app.dispatch(Event::Click { target }).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod cart;
pub mod config;
pub mod csrf;
pub mod dom;
pub mod error;
pub mod http;
pub mod notify;
pub mod search;
pub mod shell;
pub mod widgets;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

pub use api::{HttpApi, StorefrontApi};
pub use app::{Event, Storefront};
pub use cart::CartController;
pub use config::StorefrontConfig;
pub use dom::{Document, Element, NodeId, Page, Selector};
pub use error::{ApiError, Result, StorefrontError};
pub use notify::{NotificationKind, Notifier};
pub use search::SearchController;
pub use shell::Shell;
