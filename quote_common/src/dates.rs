//! Calendar-date helpers.
//!
//! All dates in the protocol are plain `YYYY-MM-DD` calendar days interpreted in UTC.
//! Parsing is done from explicit year/month/day integers so that the accepted pattern
//! is exactly four digits, dash, two digits, dash, two digits.
use chrono::{NaiveDate, Utc};
use serde::de::{Deserialize, Deserializer, Error as _};
use thiserror::Error;

/// Wire format of every calendar date.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Why a string was rejected as a calendar date.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateParseError {
    /// The text does not match `YYYY-MM-DD`.
    #[error("expected a YYYY-MM-DD date")]
    Pattern,
    /// The text matches the pattern but names no real day (e.g. `2024-02-30`).
    #[error("no such calendar day")]
    Calendar,
}

/// Parse a strict `YYYY-MM-DD` string into a calendar date.
pub fn parse_iso_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(DateParseError::Pattern);
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !digits_ok {
        return Err(DateParseError::Pattern);
    }

    let year: i32 = text[0..4].parse().map_err(|_| DateParseError::Pattern)?;
    let month: u32 = text[5..7].parse().map_err(|_| DateParseError::Pattern)?;
    let day: u32 = text[8..10].parse().map_err(|_| DateParseError::Pattern)?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateParseError::Calendar)
}

/// Serde hook decoding a field with [`parse_iso_date`] instead of chrono's lenient parser.
pub fn deserialize_iso_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_iso_date(&text).map_err(|e| D::Error::custom(format!("{}: {:?}", e, text)))
}

/// The current calendar day in UTC, independent of the local time zone.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
