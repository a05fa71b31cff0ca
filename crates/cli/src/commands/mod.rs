//! CLI command implementations.
//!
//! Every command hosts the storefront controllers on a bare page shell,
//! runs one operation through them and prints what the page would show.

pub mod cart;
pub mod search;

use std::sync::Arc;

use verzend_storefront::dom::Selector;
use verzend_storefront::notify::NOTIFICATION_ATTR;
use verzend_storefront::{Document, HttpApi, Page, Shell, Storefront, StorefrontConfig};

/// Storefront bound to a fresh page shell.
pub struct Session {
    pub app: Storefront<HttpApi>,
    pub shell: Shell,
    api: Arc<HttpApi>,
    session_configured: bool,
}

impl Session {
    /// Build the page shell and connect it to the configured backend.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn connect(config: &StorefrontConfig) -> verzend_storefront::Result<Self> {
        let mut doc = Document::new();
        let shell = Shell::build(&mut doc);
        let api = Arc::new(HttpApi::from_config(config)?);
        tracing::debug!(base_url = %config.base_url, "Connecting to storefront");
        Ok(Self {
            app: Storefront::init(Page::new(doc), Arc::clone(&api), config),
            shell,
            api,
            session_configured: config.session_id.is_some(),
        })
    }

    /// Session cookie the backend issued during this run, when none was
    /// configured. Later commands need it to see the same cart.
    #[must_use]
    pub fn issued_session_id(&self) -> Option<String> {
        if self.session_configured {
            return None;
        }
        self.api.http().session_id()
    }

    /// Texts of the banners currently shown.
    #[must_use]
    pub fn banners(&self) -> Vec<String> {
        self.app.page().read(|doc| {
            doc.query_selector_all(&Selector::attr(NOTIFICATION_ATTR))
                .into_iter()
                .map(|n| doc.text_content(n).trim().to_string())
                .collect()
        })
    }

    /// Print the cart badges and any banners.
    #[allow(clippy::print_stdout)]
    pub fn print_cart(&self) {
        let (count, hidden, total) = self.app.page().read(|doc| {
            (
                doc.text_content(self.shell.cart_count),
                doc.has_class(self.shell.cart_count, verzend_storefront::dom::HIDDEN),
                doc.text_content(self.shell.cart_total),
            )
        });
        for banner in self.banners() {
            println!("{banner}");
        }
        if hidden {
            println!("Cart: empty ({total})");
        } else {
            println!("Cart: {count} item(s), {total}");
        }
    }
}
