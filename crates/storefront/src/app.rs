//! Storefront wiring.
//!
//! [`Storefront::init`] binds every controller to the elements present in
//! the page and [`Storefront::dispatch`] routes document events to them.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use verzend_core::{ProductId, RentalPeriod, parse_quantity};

use crate::api::StorefrontApi;
use crate::cart::CartController;
use crate::config::StorefrontConfig;
use crate::dom::{NodeId, Page, Selector};
use crate::notify::Notifier;
use crate::search::SearchController;
use crate::widgets::{Dropdowns, ImageGallery, MobileMenu, QuantityStepper};

/// Marker on "add to cart" buttons. The button carries `data-product-id`
/// and optionally `data-quantity`, `data-rental-start` and `data-rental-end`.
pub const ADD_TO_CART_ATTR: &str = "data-add-to-cart";

/// A document event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Click { target: NodeId },
    /// The value of an input changed
    Input { target: NodeId },
    /// An image failed to load
    ImageError { target: NodeId },
}

/// Data read off an add-to-cart button.
#[derive(Debug)]
struct AddToCartButton {
    product_id: Option<String>,
    quantity: Option<String>,
    rental: Option<(String, String)>,
}

/// All controllers for one page.
pub struct Storefront<A> {
    page: Page,
    notifier: Notifier,
    cart: CartController<A>,
    dropdowns: Dropdowns,
    mobile_menu: Option<MobileMenu>,
    search: Option<SearchController<A>>,
    quantity: QuantityStepper<A>,
    gallery: Option<ImageGallery>,
}

impl<A: StorefrontApi> Storefront<A> {
    /// Bind controllers to `page`. Widgets whose elements are missing stay
    /// inactive.
    pub fn init(page: Page, api: Arc<A>, config: &StorefrontConfig) -> Self {
        let notifier = Notifier::new(page.clone(), config.notifications);
        let cart = CartController::new(Arc::clone(&api), page.clone(), notifier.clone());
        let search = SearchController::attach(api, page.clone(), config.search.clone());
        let mobile_menu = MobileMenu::attach(page.clone());
        let gallery = ImageGallery::attach(page.clone());

        info!(
            search = search.is_some(),
            mobile_menu = mobile_menu.is_some(),
            gallery = gallery.is_some(),
            "Storefront initialized"
        );

        Self {
            dropdowns: Dropdowns::new(page.clone()),
            quantity: QuantityStepper::new(page.clone(), cart.clone()),
            page,
            notifier,
            cart,
            mobile_menu,
            search,
            gallery,
        }
    }

    #[must_use]
    pub const fn page(&self) -> &Page {
        &self.page
    }

    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// The cart controller, for callers outside the event flow.
    #[must_use]
    pub const fn cart(&self) -> &CartController<A> {
        &self.cart
    }

    #[must_use]
    pub const fn search(&self) -> Option<&SearchController<A>> {
        self.search.as_ref()
    }

    /// Route an event to every interested controller.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, event: Event) {
        match event {
            Event::Click { target } => self.on_click(target).await,
            Event::Input { target } => {
                if let Some(search) = self.search.as_ref().filter(|s| s.input() == target) {
                    search.on_input();
                }
            }
            Event::ImageError { target } => {
                if let Some(search) = &self.search {
                    search.on_image_error(target);
                }
            }
        }
    }

    async fn on_click(&self, target: NodeId) {
        self.notifier.on_click(target);
        self.dropdowns.on_click(target);
        if let Some(menu) = &self.mobile_menu {
            menu.on_click(target);
        }
        if let Some(search) = &self.search {
            search.on_document_click(target);
        }
        self.quantity.on_click(target).await;
        if let Some(gallery) = &self.gallery {
            gallery.on_click(target);
        }
        self.on_add_to_cart_click(target).await;
    }

    async fn on_add_to_cart_click(&self, target: NodeId) {
        let Some(button) = self.page.read(|doc| {
            let button = doc.closest(target, &Selector::attr(ADD_TO_CART_ATTR))?;
            let data = |key: &str| doc.data(button, key).map(str::to_string);
            Some(AddToCartButton {
                product_id: data("product-id"),
                quantity: data("quantity"),
                rental: data("rental-start").zip(data("rental-end")),
            })
        }) else {
            return;
        };

        let Some(product_id) = button.product_id.as_deref().and_then(|id| id.parse::<ProductId>().ok())
        else {
            warn!(?button, "Add-to-cart button without a valid product id");
            return;
        };
        let quantity = parse_quantity(button.quantity.as_deref());

        match &button.rental {
            Some((start, end)) => match RentalPeriod::parse(start, end) {
                Ok(rental) => {
                    self.cart.add_with_rental(product_id, quantity, rental).await;
                }
                Err(e) => warn!(error = %e, "Add-to-cart button has an invalid rental period"),
            },
            None => {
                debug!(%product_id, quantity, "Add-to-cart button clicked");
                self.cart.add(product_id, quantity).await;
            }
        }
    }
}
