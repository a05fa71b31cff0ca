//! Plus/minus steppers around quantity inputs, forwarding to the cart.

use tracing::{debug, instrument, warn};
use verzend_core::{ProductId, QuantityBounds, QuantityStep, parse_quantity};

use crate::api::StorefrontApi;
use crate::cart::CartController;
use crate::dom::{NodeId, Page, Selector};

/// Marker on `+`/`-` buttons; the value is `increase` or `decrease`.
pub const QUANTITY_BTN_ATTR: &str = "data-quantity-btn";

/// Marker on the element grouping the buttons with their input.
pub const QUANTITY_WRAPPER_ATTR: &str = "data-quantity-wrapper";

/// Next value of a quantity input.
///
/// An unparsable current value counts as 1. The result always lies within
/// `bounds`.
#[must_use]
pub fn step_quantity(current: Option<&str>, step: QuantityStep, bounds: QuantityBounds) -> i64 {
    step.apply(parse_quantity(current), bounds)
}

/// `+`/`-` buttons around numeric quantity inputs.
///
/// On the cart page the wrapper carries `data-product-id` and every change
/// is sent to the backend.
pub struct QuantityStepper<A> {
    page: Page,
    cart: CartController<A>,
}

impl<A> Clone for QuantityStepper<A> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            cart: self.cart.clone(),
        }
    }
}

impl<A: StorefrontApi> QuantityStepper<A> {
    pub const fn new(page: Page, cart: CartController<A>) -> Self {
        Self { page, cart }
    }

    /// Handle a click; returns whether it landed on a quantity button.
    #[instrument(skip(self))]
    pub async fn on_click(&self, target: NodeId) -> bool {
        let change = self.page.write(|doc| {
            let button = doc.closest(target, &Selector::attr(QUANTITY_BTN_ATTR))?;
            let Some(wrapper) = doc.closest(button, &Selector::attr(QUANTITY_WRAPPER_ATTR)) else {
                debug!("Quantity button outside a quantity wrapper");
                return None;
            };
            let input = doc.query_selector_in(
                wrapper,
                &Selector::tag("input").with_attr_value("type", "number"),
            )?;
            let Some(step) = doc.attribute(button, QUANTITY_BTN_ATTR).and_then(QuantityStep::parse)
            else {
                debug!("Unknown quantity button action");
                return None;
            };

            let bounds =
                QuantityBounds::from_attributes(doc.attribute(input, "min"), doc.attribute(input, "max"));
            let value = step_quantity(doc.value(input), step, bounds);
            doc.set_value(input, &value.to_string());

            let product_id = doc
                .data(wrapper, "product-id")
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string);
            Some((value, product_id))
        });

        let Some((value, product_id)) = change else {
            return false;
        };

        if let Some(raw) = product_id {
            match raw.parse::<ProductId>() {
                Ok(product_id) => {
                    self.cart.update(product_id, value).await;
                }
                Err(e) => warn!(error = %e, "Quantity wrapper has an invalid product id"),
            }
        }
        true
    }
}
