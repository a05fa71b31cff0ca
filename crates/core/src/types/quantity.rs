//! Quantity stepping and clamping for numeric quantity inputs.

use serde::{Deserialize, Serialize};

/// Inclusive bounds for a quantity input.
///
/// Mirrors the `min`/`max` attributes of an `<input type="number">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityBounds {
    pub min: i64,
    pub max: i64,
}

impl Default for QuantityBounds {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

impl QuantityBounds {
    /// Lower bound used when the input has no usable `min` attribute.
    pub const DEFAULT_MIN: i64 = 1;
    /// Upper bound used when the input has no usable `max` attribute.
    pub const DEFAULT_MAX: i64 = 99;

    /// Build bounds from raw attribute values.
    ///
    /// Attributes are read like `parseInt`: the leading integer counts and
    /// trailing text is ignored. Missing, unparsable or zero attributes fall
    /// back to the defaults.
    #[must_use]
    pub fn from_attributes(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: parse_or(min, Self::DEFAULT_MIN),
            max: parse_or(max, Self::DEFAULT_MAX),
        }
    }

    /// Clamp a value into `[min, max]`.
    ///
    /// Never panics, even when the markup declares `min > max`; the upper
    /// bound wins in that case.
    #[must_use]
    pub fn clamp(&self, value: i64) -> i64 {
        value.max(self.min).min(self.max)
    }
}

/// Direction of a quantity button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityStep {
    Increase,
    Decrease,
}

impl QuantityStep {
    /// Parse the value of a `data-quantity-btn` attribute.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        match action.trim() {
            "increase" => Some(Self::Increase),
            "decrease" => Some(Self::Decrease),
            _ => None,
        }
    }

    /// Apply this step to `current` and clamp the result.
    #[must_use]
    pub fn apply(self, current: i64, bounds: QuantityBounds) -> i64 {
        let stepped = match self {
            Self::Increase => current.saturating_add(1),
            Self::Decrease => current.saturating_sub(1),
        };
        bounds.clamp(stepped)
    }
}

/// Parse the displayed value of a quantity input.
///
/// `"2.5"` reads as 2. Empty, unparsable and zero values read as 1.
#[must_use]
pub fn parse_quantity(value: Option<&str>) -> i64 {
    parse_or(value, 1)
}

/// Leading integer of `value`, or `default` when there is none or it is 0.
fn parse_or(value: Option<&str>, default: i64) -> i64 {
    value
        .and_then(leading_integer)
        .filter(|n| *n != 0)
        .unwrap_or(default)
}

/// Optional sign followed by at least one ASCII digit, after leading
/// whitespace. Anything after the digits is ignored.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return None;
    }
    let sign_len = value.len() - unsigned.len();
    let number = value.get(..sign_len + digits)?;
    number.parse::<i64>().ok().or_else(|| {
        // Overflowing digit runs saturate instead of failing.
        Some(if number.starts_with('-') { i64::MIN } else { i64::MAX })
    })
}
