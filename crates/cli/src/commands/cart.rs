//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! vc-cli cart add 12 -q 2
//! vc-cli cart add 12 --from 2026-08-01 --to 2026-08-03
//! vc-cli cart update 12 3
//! vc-cli cart remove 12
//! vc-cli cart clear
//! ```

use verzend_core::{ProductId, RentalPeriod};
use verzend_storefront::StorefrontConfig;
use verzend_storefront::api::CartResponse;
use verzend_storefront::cart::format_total;

use super::Session;

/// Add a product, optionally as a rental for the given period.
///
/// # Errors
///
/// Returns error if the session cannot be created.
pub async fn add(
    config: &StorefrontConfig,
    product_id: ProductId,
    quantity: i64,
    rental: Option<RentalPeriod>,
) -> verzend_storefront::Result<()> {
    let session = Session::connect(config)?;
    let cart = session.app.cart();
    let response = match rental {
        Some(rental) => cart.add_with_rental(product_id, quantity, rental).await,
        None => cart.add(product_id, quantity).await,
    };
    report(&session, response.as_ref());
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns error if the session cannot be created.
pub async fn update(
    config: &StorefrontConfig,
    product_id: ProductId,
    quantity: i64,
) -> verzend_storefront::Result<()> {
    let session = Session::connect(config)?;
    let response = session.app.cart().update(product_id, quantity).await;
    report(&session, response.as_ref());
    Ok(())
}

/// Remove a product from the cart.
///
/// # Errors
///
/// Returns error if the session cannot be created.
pub async fn remove(config: &StorefrontConfig, product_id: ProductId) -> verzend_storefront::Result<()> {
    let session = Session::connect(config)?;
    let response = session.app.cart().remove(product_id).await;
    report(&session, response.as_ref());
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns error if the session cannot be created.
pub async fn clear(config: &StorefrontConfig) -> verzend_storefront::Result<()> {
    let session = Session::connect(config)?;
    let response = session.app.cart().clear().await;
    report(&session, response.as_ref());
    Ok(())
}

#[allow(clippy::print_stdout)]
fn report(session: &Session, response: Option<&CartResponse>) {
    session.print_cart();
    if let Some(session_id) = session.issued_session_id() {
        println!("New cart session; run further cart commands with:");
        println!("  export STOREFRONT_SESSION_ID={session_id}");
    }
    match response {
        Some(CartResponse {
            success: true,
            item_total: Some(item_total),
            ..
        }) => println!("Line total: {}", format_total(*item_total)),
        Some(CartResponse {
            success: false,
            error: Some(error),
            ..
        }) => tracing::warn!("Server rejected the request: {error}"),
        Some(_) => {}
        None => tracing::error!("No response from the storefront"),
    }
}
