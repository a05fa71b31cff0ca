//! Request and response bodies of the storefront endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use verzend_core::{ProductId, RentalPeriod};

/// Body of `POST /cart/add/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Serialized as `rental_start_date` / `rental_end_date`
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub rental: Option<RentalPeriod>,
}

impl AddToCartRequest {
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: i64) -> Self {
        Self {
            product_id,
            quantity,
            rental: None,
        }
    }

    #[must_use]
    pub const fn with_rental(mut self, rental: RentalPeriod) -> Self {
        self.rental = Some(rental);
        self
    }
}

/// Body of `POST /cart/update/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Body of `POST /cart/remove/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Body of `POST /cart/clear/`, an empty object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClearCartRequest {}

/// Response of every cart endpoint.
///
/// Failures come back as `{"success": false, "error": "..."}`, usually with
/// a 400 or 404 status. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cart_count: Option<u32>,
    #[serde(default)]
    pub cart_total: Option<Decimal>,
    /// Line total after an update
    #[serde(default)]
    pub item_total: Option<Decimal>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /api/search/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One product row in the live search dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    pub name: String,
    /// Decimal rendered as a string by the backend, shown verbatim
    #[serde(deserialize_with = "string_or_number")]
    pub price: String,
    pub url: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::String(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
