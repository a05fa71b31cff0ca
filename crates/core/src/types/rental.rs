//! Rental period attached to cart additions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`RentalPeriod`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RentalPeriodError {
    /// A date was not in `YYYY-MM-DD` form.
    #[error("invalid date {0:?}, use YYYY-MM-DD")]
    InvalidDate(String),
    /// The end date is before the start date.
    #[error("rental end {end} is before start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// An inclusive rental date range.
///
/// Serializes to the `rental_start_date` / `rental_end_date` fields the cart
/// endpoint expects. Deserialization goes through [`RentalPeriod::new`], so
/// an inverted range is rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRentalPeriod")]
pub struct RentalPeriod {
    #[serde(rename = "rental_start_date")]
    start: NaiveDate,
    #[serde(rename = "rental_end_date")]
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawRentalPeriod {
    rental_start_date: NaiveDate,
    rental_end_date: NaiveDate,
}

impl TryFrom<RawRentalPeriod> for RentalPeriod {
    type Error = RentalPeriodError;

    fn try_from(raw: RawRentalPeriod) -> Result<Self, Self::Error> {
        Self::new(raw.rental_start_date, raw.rental_end_date)
    }
}

impl RentalPeriod {
    /// Wire format for rental dates.
    pub const DATE_FORMAT: &'static str = "%Y-%m-%d";

    /// Create a rental period.
    ///
    /// # Errors
    ///
    /// Returns [`RentalPeriodError::EndBeforeStart`] if `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RentalPeriodError> {
        if end < start {
            return Err(RentalPeriodError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a rental period from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either date is malformed or the range is inverted.
    pub fn parse(start: &str, end: &str) -> Result<Self, RentalPeriodError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), Self::DATE_FORMAT)
                .map_err(|_| RentalPeriodError::InvalidDate(s.to_string()))
        };
        Self::new(parse(start)?, parse(end)?)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of rental days, counting both ends.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}
