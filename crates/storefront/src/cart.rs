//! Cart controller.
//!
//! Sends cart mutations to the backend and patches the cart badges from the
//! response. The page never keeps its own copy of the cart: `.cart-count`
//! and `.cart-total` elements only change when a response says so.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};
use verzend_core::{Price, ProductId, RentalPeriod};

use crate::api::{
    AddToCartRequest, CartResponse, RemoveFromCartRequest, StorefrontApi, UpdateCartRequest,
};
use crate::dom::{HIDDEN, Page, Selector};
use crate::notify::{NotificationKind, Notifier};

/// Class of every cart item count badge.
pub const CART_COUNT_CLASS: &str = "cart-count";

/// Class of every cart total label.
pub const CART_TOTAL_CLASS: &str = "cart-total";

pub const MSG_ADDED: &str = "Product added to cart!";
pub const MSG_ADD_FAILED: &str = "Failed to add product";
pub const MSG_REMOVED: &str = "Product removed from cart";
pub const MSG_CLEARED: &str = "Cart cleared";
pub const MSG_GENERIC_ERROR: &str = "Something went wrong";

/// What a count badge shows for a given item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountProjection {
    pub text: String,
    /// An empty cart hides the badge
    pub hidden: bool,
}

impl CountProjection {
    #[must_use]
    pub fn new(count: u32) -> Self {
        Self {
            text: count.to_string(),
            hidden: count == 0,
        }
    }
}

/// Text of a cart total label, e.g. `€5.00`.
#[must_use]
pub fn format_total(total: Decimal) -> String {
    Price::eur(total).display()
}

/// Cart operations against the backend, reflected into the page.
///
/// Every operation swallows its errors: failures are logged and, on the add
/// path, shown as a banner. The returned response is `None` when no JSON
/// body could be decoded.
pub struct CartController<A> {
    api: Arc<A>,
    page: Page,
    notifier: Notifier,
}

impl<A> Clone for CartController<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            page: self.page.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<A: StorefrontApi> CartController<A> {
    pub const fn new(api: Arc<A>, page: Page, notifier: Notifier) -> Self {
        Self {
            api,
            page,
            notifier,
        }
    }

    /// Add a product to the cart.
    #[instrument(skip(self))]
    pub async fn add(&self, product_id: ProductId, quantity: i64) -> Option<CartResponse> {
        self.submit_add(AddToCartRequest::new(product_id, quantity))
            .await
    }

    /// Add a rental product for the given period.
    #[instrument(skip(self))]
    pub async fn add_with_rental(
        &self,
        product_id: ProductId,
        quantity: i64,
        rental: RentalPeriod,
    ) -> Option<CartResponse> {
        self.submit_add(AddToCartRequest::new(product_id, quantity).with_rental(rental))
            .await
    }

    async fn submit_add(&self, request: AddToCartRequest) -> Option<CartResponse> {
        match self.api.add_to_cart(&request).await {
            Ok(response) => {
                if response.success {
                    info!(product_id = %request.product_id, "Product added to cart");
                    self.apply_count(&response);
                    self.notifier.show(MSG_ADDED, NotificationKind::Success);
                } else {
                    warn!(product_id = %request.product_id, error = ?response.error, "Add to cart rejected");
                    let message = response.error.as_deref().unwrap_or(MSG_ADD_FAILED);
                    self.notifier.show(message, NotificationKind::Error);
                }
                Some(response)
            }
            Err(e) => {
                error!(error = %e, product_id = %request.product_id, "Failed to add to cart");
                self.notifier.show(MSG_GENERIC_ERROR, NotificationKind::Error);
                None
            }
        }
    }

    /// Set the quantity of a cart line.
    #[instrument(skip(self))]
    pub async fn update(&self, product_id: ProductId, quantity: i64) -> Option<CartResponse> {
        let request = UpdateCartRequest {
            product_id,
            quantity,
        };
        match self.api.update_cart(&request).await {
            Ok(response) => {
                if response.success {
                    self.apply_count(&response);
                    self.apply_total(&response);
                } else {
                    warn!(error = ?response.error, "Cart update rejected");
                }
                Some(response)
            }
            Err(e) => {
                error!(error = %e, "Failed to update cart");
                None
            }
        }
    }

    /// Remove a product from the cart.
    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: ProductId) -> Option<CartResponse> {
        match self
            .api
            .remove_from_cart(&RemoveFromCartRequest { product_id })
            .await
        {
            Ok(response) => {
                if response.success {
                    self.apply_count(&response);
                    self.notifier.show(MSG_REMOVED, NotificationKind::Success);
                } else {
                    warn!(error = ?response.error, "Cart removal rejected");
                }
                Some(response)
            }
            Err(e) => {
                error!(error = %e, "Failed to remove from cart");
                None
            }
        }
    }

    /// Empty the cart.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Option<CartResponse> {
        match self.api.clear_cart().await {
            Ok(response) => {
                if response.success {
                    self.update_cart_count(response.cart_count.unwrap_or(0));
                    self.update_cart_total(response.cart_total.unwrap_or(Decimal::ZERO));
                    self.notifier.show(MSG_CLEARED, NotificationKind::Success);
                } else {
                    warn!(error = ?response.error, "Cart clear rejected");
                }
                Some(response)
            }
            Err(e) => {
                error!(error = %e, "Failed to clear cart");
                None
            }
        }
    }

    /// Write `count` into every `.cart-count` element, hiding them at zero.
    pub fn update_cart_count(&self, count: u32) {
        let projection = CountProjection::new(count);
        self.page.write(|doc| {
            for node in doc.query_selector_all(&Selector::class(CART_COUNT_CLASS)) {
                doc.set_text(node, &projection.text);
                doc.set_class(node, HIDDEN, projection.hidden);
            }
        });
    }

    /// Write `total` into every `.cart-total` element.
    pub fn update_cart_total(&self, total: Decimal) {
        let text = format_total(total);
        self.page.write(|doc| {
            for node in doc.query_selector_all(&Selector::class(CART_TOTAL_CLASS)) {
                doc.set_text(node, &text);
            }
        });
    }

    fn apply_count(&self, response: &CartResponse) {
        match response.cart_count {
            Some(count) => self.update_cart_count(count),
            None => warn!("Successful cart response without cart_count"),
        }
    }

    fn apply_total(&self, response: &CartResponse) {
        match response.cart_total {
            Some(total) => self.update_cart_total(total),
            None => warn!("Successful cart response without cart_total"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::config::NotificationConfig;
    use crate::dom::Document;
    use crate::notify::NOTIFICATION_ATTR;
    use crate::shell::Shell;
    use crate::testing::{ApiCall, FakeApi, cart_failure, cart_ok};

    fn setup() -> (Arc<FakeApi>, Page, Shell, CartController<FakeApi>) {
        let mut doc = Document::new();
        let shell = Shell::build(&mut doc);
        let page = Page::new(doc);
        let api = Arc::new(FakeApi::default());
        let notifier = Notifier::new(page.clone(), NotificationConfig::default());
        let cart = CartController::new(Arc::clone(&api), page.clone(), notifier);
        (api, page, shell, cart)
    }

    fn banners(page: &Page) -> Vec<String> {
        page.read(|doc| {
            doc.query_selector_all(&Selector::attr(NOTIFICATION_ATTR))
                .into_iter()
                .map(|n| doc.text_content(n).trim().to_string())
                .collect()
        })
    }

    fn badge_texts(page: &Page, class: &str) -> Vec<(String, bool)> {
        page.read(|doc| {
            doc.query_selector_all(&Selector::class(class))
                .into_iter()
                .map(|n| (doc.text_content(n), doc.has_class(n, HIDDEN)))
                .collect()
        })
    }

    #[test]
    fn test_count_projection() {
        assert_eq!(
            CountProjection::new(0),
            CountProjection {
                text: "0".to_string(),
                hidden: true
            }
        );
        assert!(!CountProjection::new(4).hidden);
    }

    #[test]
    fn test_format_total() {
        assert_eq!(format_total(Decimal::from(5)), "€5.00");
        assert_eq!(format_total(Decimal::from_str("12.5").unwrap()), "€12.50");
        assert_eq!(format_total(Decimal::ZERO), "€0.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_success_updates_every_badge() {
        let (api, page, _, cart) = setup();
        api.set_cart_reply(cart_ok(Some(3), None));

        let response = cart.add(ProductId::new(7), 1).await.unwrap();
        assert!(response.success);
        assert_eq!(
            badge_texts(&page, CART_COUNT_CLASS),
            vec![("3".to_string(), false), ("3".to_string(), false)]
        );
        assert_eq!(banners(&page), vec![MSG_ADDED.to_string()]);
        assert_eq!(
            api.calls(),
            vec![ApiCall::Add(AddToCartRequest::new(ProductId::new(7), 1))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_rejected_shows_server_error() {
        let (api, page, _, cart) = setup();
        api.set_cart_reply(CartResponse {
            success: false,
            error: Some("Product not available".to_string()),
            ..CartResponse::default()
        });

        cart.add(ProductId::new(7), 1).await;
        assert_eq!(banners(&page), vec!["Product not available".to_string()]);
        // Badges untouched.
        assert_eq!(badge_texts(&page, CART_COUNT_CLASS)[0].0, "0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_rejected_without_message_uses_fallback() {
        let (api, page, _, cart) = setup();
        api.set_cart_reply(CartResponse::default());

        cart.add(ProductId::new(7), 1).await;
        assert_eq!(banners(&page), vec![MSG_ADD_FAILED.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_transport_failure_shows_generic_error() {
        let (api, page, _, cart) = setup();
        api.set_cart_failure();

        assert!(cart.add(ProductId::new(7), 1).await.is_none());
        assert_eq!(banners(&page), vec![MSG_GENERIC_ERROR.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_with_rental_sends_period() {
        let (api, _, _, cart) = setup();
        let rental = RentalPeriod::parse("2026-07-01", "2026-07-04").unwrap();

        cart.add_with_rental(ProductId::new(2), 1, rental).await;
        assert_eq!(
            api.calls(),
            vec![ApiCall::Add(
                AddToCartRequest::new(ProductId::new(2), 1).with_rental(rental)
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_success_sets_count_and_total_silently() {
        let (api, page, _, cart) = setup();
        api.set_cart_reply(cart_ok(Some(2), Some("5")));

        cart.update(ProductId::new(7), 2).await;
        assert_eq!(badge_texts(&page, CART_COUNT_CLASS)[0].0, "2");
        assert_eq!(badge_texts(&page, CART_TOTAL_CLASS)[0].0, "€5.00");
        assert!(banners(&page).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_to_zero_hides_badge() {
        let (api, page, _, cart) = setup();
        cart.update_cart_count(4);
        api.set_cart_reply(cart_ok(Some(0), Some("0")));

        cart.update(ProductId::new(7), 0).await;
        assert!(badge_texts(&page, CART_COUNT_CLASS).iter().all(|(t, hidden)| t == "0" && *hidden));
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_failure_leaves_projections() {
        let (api, page, _, cart) = setup();
        cart.update_cart_total(Decimal::from(9));
        api.set_cart_reply(cart_failure("Item not in cart"));

        cart.update(ProductId::new(7), 3).await;
        assert_eq!(badge_texts(&page, CART_TOTAL_CLASS)[0].0, "€9.00");
        assert!(banners(&page).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_total_leaves_total_untouched() {
        let (api, page, _, cart) = setup();
        cart.update_cart_total(Decimal::from(9));
        api.set_cart_reply(cart_ok(Some(1), None));

        cart.update(ProductId::new(7), 1).await;
        assert_eq!(badge_texts(&page, CART_COUNT_CLASS)[0].0, "1");
        assert_eq!(badge_texts(&page, CART_TOTAL_CLASS)[0].0, "€9.00");
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_success_notifies() {
        let (api, page, _, cart) = setup();
        cart.update_cart_count(2);
        api.set_cart_reply(cart_ok(Some(1), Some("3.50")));

        cart.remove(ProductId::new(7)).await;
        assert_eq!(badge_texts(&page, CART_COUNT_CLASS)[0].0, "1");
        assert_eq!(banners(&page), vec![MSG_REMOVED.to_string()]);
        assert_eq!(
            api.calls(),
            vec![ApiCall::Remove(RemoveFromCartRequest {
                product_id: ProductId::new(7)
            })]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_transport_failure_is_silent() {
        let (api, page, _, cart) = setup();
        api.set_cart_failure();

        assert!(cart.remove(ProductId::new(7)).await.is_none());
        assert!(banners(&page).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_resets_projections() {
        let (api, page, _, cart) = setup();
        cart.update_cart_count(5);
        cart.update_cart_total(Decimal::from(40));
        api.set_cart_reply(cart_ok(Some(0), Some("0")));

        cart.clear().await;
        assert_eq!(badge_texts(&page, CART_COUNT_CLASS)[0], ("0".to_string(), true));
        assert_eq!(badge_texts(&page, CART_TOTAL_CLASS)[0].0, "€0.00");
        assert_eq!(banners(&page), vec![MSG_CLEARED.to_string()]);
        assert_eq!(api.calls(), vec![ApiCall::Clear]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_calls_are_not_deduplicated() {
        let (api, _, _, cart) = setup();
        cart.add(ProductId::new(1), 1).await;
        cart.add(ProductId::new(1), 1).await;
        assert_eq!(api.calls().len(), 2);
    }
}
