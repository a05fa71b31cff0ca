//! In-memory [`StorefrontApi`] for controller tests.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::{Instant, sleep};

use crate::api::{
    AddToCartRequest, CartResponse, RemoveFromCartRequest, SearchResponse, SearchResult,
    StorefrontApi, UpdateCartRequest,
};
use crate::error::ApiError;

/// A call received by [`FakeApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Add(AddToCartRequest),
    Update(UpdateCartRequest),
    Remove(RemoveFromCartRequest),
    Clear,
    Search(String),
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<(Instant, ApiCall)>,
    cart_reply: Option<CartResponse>,
    cart_fails: bool,
    search_results: HashMap<String, Vec<SearchResult>>,
    search_delays: HashMap<String, Duration>,
    search_fails: bool,
}

/// Records calls and answers with canned replies.
///
/// Cart calls answer `{"success": true}` until told otherwise; searches
/// answer with no results unless a query has been registered.
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

fn parse_failure() -> ApiError {
    ApiError::Parse(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err())
}

impl FakeApi {
    fn with_state<R>(&self, f: impl FnOnce(&mut FakeState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn set_cart_reply(&self, reply: CartResponse) {
        self.with_state(|s| {
            s.cart_reply = Some(reply);
            s.cart_fails = false;
        });
    }

    /// Make cart calls fail as if the body were not JSON.
    pub fn set_cart_failure(&self) {
        self.with_state(|s| s.cart_fails = true);
    }

    pub fn set_search_results(&self, query: &str, results: Vec<SearchResult>) {
        self.with_state(|s| s.search_results.insert(query.to_string(), results));
    }

    /// Delay the response for `query` after the request is recorded.
    pub fn set_search_delay(&self, query: &str, delay: Duration) {
        self.with_state(|s| s.search_delays.insert(query.to_string(), delay));
    }

    pub fn set_search_failure(&self) {
        self.with_state(|s| s.search_fails = true);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.with_state(|s| s.calls.iter().map(|(_, c)| c.clone()).collect())
    }

    /// Search queries with the instant each request was issued.
    pub fn searches(&self) -> Vec<(Instant, String)> {
        self.with_state(|s| {
            s.calls
                .iter()
                .filter_map(|(at, call)| match call {
                    ApiCall::Search(q) => Some((*at, q.clone())),
                    _ => None,
                })
                .collect()
        })
    }

    fn record_cart(&self, call: ApiCall) -> Result<CartResponse, ApiError> {
        self.with_state(|s| {
            s.calls.push((Instant::now(), call));
            if s.cart_fails {
                Err(parse_failure())
            } else {
                Ok(s.cart_reply.clone().unwrap_or_else(|| CartResponse {
                    success: true,
                    ..CartResponse::default()
                }))
            }
        })
    }
}

impl StorefrontApi for FakeApi {
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<CartResponse, ApiError> {
        self.record_cart(ApiCall::Add(request.clone()))
    }

    async fn update_cart(&self, request: &UpdateCartRequest) -> Result<CartResponse, ApiError> {
        self.record_cart(ApiCall::Update(*request))
    }

    async fn remove_from_cart(
        &self,
        request: &RemoveFromCartRequest,
    ) -> Result<CartResponse, ApiError> {
        self.record_cart(ApiCall::Remove(*request))
    }

    async fn clear_cart(&self) -> Result<CartResponse, ApiError> {
        self.record_cart(ApiCall::Clear)
    }

    async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let delay = self.with_state(|s| {
            s.calls
                .push((Instant::now(), ApiCall::Search(query.to_string())));
            s.search_delays.get(query).copied()
        });
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        self.with_state(|s| {
            if s.search_fails {
                return Err(parse_failure());
            }
            Ok(SearchResponse {
                results: s.search_results.get(query).cloned().unwrap_or_default(),
            })
        })
    }
}

/// A successful cart response.
pub fn cart_ok(count: Option<u32>, total: Option<&str>) -> CartResponse {
    CartResponse {
        success: true,
        cart_count: count,
        cart_total: total.map(|t| Decimal::from_str(t).unwrap()),
        ..CartResponse::default()
    }
}

/// A rejected cart response carrying `error`.
pub fn cart_failure(error: &str) -> CartResponse {
    CartResponse {
        success: false,
        error: Some(error.to_string()),
        ..CartResponse::default()
    }
}

/// A search result row.
pub fn product(name: &str, price: &str, image: Option<&str>) -> SearchResult {
    SearchResult {
        name: name.to_string(),
        price: price.to_string(),
        url: format!("/products/{}/", name.to_lowercase().replace(' ', "-")),
        image: image.map(str::to_string),
        id: None,
        category: None,
    }
}
