//! Storefront backend endpoints.
//!
//! Controllers depend on the [`StorefrontApi`] trait rather than on the HTTP
//! client directly, so they can be driven by an in-memory fake in tests.
//!
//! # Endpoints
//!
//! | Call | Method | Path |
//! |---|---|---|
//! | add | POST | `/cart/add/` |
//! | update | POST | `/cart/update/` |
//! | remove | POST | `/cart/remove/` |
//! | clear | POST | `/cart/clear/` |
//! | search | GET | `/api/search/?q=<query>` |

pub mod types;

use std::future::Future;

use tracing::instrument;

pub use types::{
    AddToCartRequest, CartResponse, ClearCartRequest, RemoveFromCartRequest, SearchResponse,
    SearchResult, UpdateCartRequest,
};

use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::http::HttpClient;

pub const CART_ADD_PATH: &str = "/cart/add/";
pub const CART_UPDATE_PATH: &str = "/cart/update/";
pub const CART_REMOVE_PATH: &str = "/cart/remove/";
pub const CART_CLEAR_PATH: &str = "/cart/clear/";
pub const SEARCH_PATH: &str = "/api/search/";

/// One method per storefront endpoint.
///
/// Implementations return the decoded JSON body whatever the HTTP status;
/// only transport failures and undecodable bodies are errors.
pub trait StorefrontApi: Send + Sync + 'static {
    fn add_to_cart(
        &self,
        request: &AddToCartRequest,
    ) -> impl Future<Output = Result<CartResponse, ApiError>> + Send;

    fn update_cart(
        &self,
        request: &UpdateCartRequest,
    ) -> impl Future<Output = Result<CartResponse, ApiError>> + Send;

    fn remove_from_cart(
        &self,
        request: &RemoveFromCartRequest,
    ) -> impl Future<Output = Result<CartResponse, ApiError>> + Send;

    fn clear_cart(&self) -> impl Future<Output = Result<CartResponse, ApiError>> + Send;

    fn search(&self, query: &str)
    -> impl Future<Output = Result<SearchResponse, ApiError>> + Send;
}

/// Path and query string for a search request.
#[must_use]
pub fn search_path(query: &str) -> String {
    format!("{SEARCH_PATH}?q={}", urlencoding::encode(query))
}

/// [`StorefrontApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: HttpClient,
}

impl HttpApi {
    #[must_use]
    pub const fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Build the HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, ApiError> {
        Ok(Self::new(HttpClient::new(config)?))
    }

    #[must_use]
    pub const fn http(&self) -> &HttpClient {
        &self.http
    }
}

impl StorefrontApi for HttpApi {
    #[instrument(skip(self))]
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<CartResponse, ApiError> {
        self.http.post_json(CART_ADD_PATH, request).await
    }

    #[instrument(skip(self))]
    async fn update_cart(&self, request: &UpdateCartRequest) -> Result<CartResponse, ApiError> {
        self.http.post_json(CART_UPDATE_PATH, request).await
    }

    #[instrument(skip(self))]
    async fn remove_from_cart(
        &self,
        request: &RemoveFromCartRequest,
    ) -> Result<CartResponse, ApiError> {
        self.http.post_json(CART_REMOVE_PATH, request).await
    }

    #[instrument(skip(self))]
    async fn clear_cart(&self) -> Result<CartResponse, ApiError> {
        self.http
            .post_json(CART_CLEAR_PATH, &ClearCartRequest::default())
            .await
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        self.http.get_json(&search_path(query)).await
    }
}
