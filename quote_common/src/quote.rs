//! Historical quote record.
//!
//! A `QuoteRecord` is one trading day of OHLCV figures for a symbol. Series are stored
//! as JSON arrays of these records, one file per symbol, and returned to clients in the
//! same shape.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::deserialize_iso_date;

/// One day's open/high/low/close/volume figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Trading day (UTC calendar date, strictly `YYYY-MM-DD` on the wire).
    #[serde(deserialize_with = "deserialize_iso_date")]
    pub date: NaiveDate,
    /// Opening price.
    pub open: f64,
    /// Highest price of the day.
    pub high: f64,
    /// Lowest price of the day.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: u64,
}

impl QuoteRecord {
    /// True when every price field is a finite number.
    pub fn has_finite_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite())
    }
}
