//! Integration tests for the VerzendConnect storefront client.
//!
//! Each test starts a `wiremock` server standing in for the storefront
//! backend and drives the real HTTP client and controllers against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p verzend-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_api` - Cart endpoints, CSRF handling, error bodies
//! - `search_api` - Search endpoint and the debounced search box

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;
use verzend_storefront::dom::Selector;
use verzend_storefront::notify::NOTIFICATION_ATTR;
use verzend_storefront::search::SearchPhase;
use verzend_storefront::{Document, HttpApi, Page, Shell, Storefront, StorefrontConfig};
use wiremock::MockServer;

/// CSRF token seeded into the client's cookie jar by [`TestContext::start`].
pub const TEST_CSRF_TOKEN: &str = "test-csrf-token";

/// A mock backend plus a client configured against it.
pub struct TestContext {
    pub server: MockServer,
    pub config: StorefrontConfig,
}

impl TestContext {
    /// Start a mock backend with the CSRF cookie set.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    pub async fn start() -> Self {
        Self::start_with_token(Some(TEST_CSRF_TOKEN)).await
    }

    /// Start a mock backend; `None` leaves the cookie jar empty.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[allow(clippy::unwrap_used)]
    pub async fn start_with_token(token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let mut config = StorefrontConfig::new(Url::parse(&server.uri()).unwrap());
        config.csrf_token = token.map(SecretString::from);
        config.search.debounce = Duration::from_millis(20);
        Self { server, config }
    }

    /// HTTP API client for the mock backend.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn api(&self) -> HttpApi {
        HttpApi::from_config(&self.config).unwrap()
    }

    /// Storefront on a fresh page shell, talking to the mock backend.
    #[must_use]
    pub fn storefront(&self) -> (Storefront<HttpApi>, Shell) {
        let mut doc = Document::new();
        let shell = Shell::build(&mut doc);
        let app = Storefront::init(Page::new(doc), Arc::new(self.api()), &self.config);
        (app, shell)
    }
}

/// Texts of the banners currently on the page.
#[must_use]
pub fn banners(page: &Page) -> Vec<String> {
    page.read(|doc| {
        doc.query_selector_all(&Selector::attr(NOTIFICATION_ATTR))
            .into_iter()
            .map(|n| doc.text_content(n).trim().to_string())
            .collect()
    })
}

/// Wait until the search box has no scheduled or in-flight search.
pub async fn search_settled(app: &Storefront<HttpApi>) {
    if let Some(search) = app.search() {
        while search.phase() == SearchPhase::Pending {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
