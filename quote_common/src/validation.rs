//! Request validation and response shape checks.
//!
//! `validate_quote_request` turns an untyped JSON value into a [`QuoteQuery`]. Every field
//! is checked on its own before the cross-field date order check, and all problems are
//! collected into one [`FieldErrors`] map so the caller can report them together.
//!
//! `check_result_shape` re-checks an assembled [`QuoteQueryResult`] against the same
//! structural rules the response promises; a failure there is our bug, not the caller's.
use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::ValidateEmail;

use crate::dates::{DateParseError, parse_iso_date};
use crate::error::QuoteError;
use crate::query::{DateRange, QuoteQuery, QuoteQueryResult};

/// Field name of the symbol code in the wire request.
pub const FIELD_SYMBOL: &str = "symbol";
/// Field name of the first day in the wire request.
pub const FIELD_START_DATE: &str = "startDate";
/// Field name of the last day in the wire request.
pub const FIELD_END_DATE: &str = "endDate";
/// Field name of the notification address in the wire request.
pub const FIELD_EMAIL: &str = "email";
/// Key for errors that concern the request as a whole.
pub const FIELD_FORM: &str = "_form";

/// Messages per offending field, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more message against `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(String::from(field))
            .or_default()
            .push(message.into());
    }

    /// True when no field has been flagged.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// True when `field` has at least one message.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Names of every flagged field.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", field, messages.join(", "))?;
        }
        Ok(())
    }
}

fn string_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match object.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, "Required");
            None
        }
        Some(Value::String(text)) => Some(text.as_str()),
        Some(_) => {
            errors.add(field, "Expected string");
            None
        }
    }
}

/// Check one date field. Returns the parsed day even when it is in the future, so the
/// cross-field order check can still run.
fn check_date(
    field: &str,
    text: &str,
    today: NaiveDate,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    match parse_iso_date(text) {
        Ok(date) => {
            if date > today {
                errors.add(field, "Date cannot be in the future");
            }
            Some(date)
        }
        Err(DateParseError::Pattern) => {
            errors.add(field, "Valid date format is YYYY-MM-DD");
            None
        }
        Err(DateParseError::Calendar) => {
            errors.add(field, "Invalid date");
            None
        }
    }
}

/// Validate a raw quote request against `today` (the current UTC day).
pub fn validate_quote_request(raw: &Value, today: NaiveDate) -> Result<QuoteQuery, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Some(object) = raw.as_object() else {
        errors.add(FIELD_FORM, "Expected an object");
        return Err(errors);
    };

    let symbol = string_field(object, FIELD_SYMBOL, &mut errors)
        .map(str::trim)
        .and_then(|symbol| {
            if symbol.is_empty() {
                errors.add(FIELD_SYMBOL, "Symbol is required");
                None
            } else {
                Some(symbol)
            }
        });

    let start = string_field(object, FIELD_START_DATE, &mut errors)
        .and_then(|text| check_date(FIELD_START_DATE, text, today, &mut errors));
    let end = string_field(object, FIELD_END_DATE, &mut errors)
        .and_then(|text| check_date(FIELD_END_DATE, text, today, &mut errors));

    let email = string_field(object, FIELD_EMAIL, &mut errors).and_then(|address| {
        if address.validate_email() {
            Some(address)
        } else {
            errors.add(FIELD_EMAIL, "Invalid email");
            None
        }
    });

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.add(FIELD_END_DATE, "Start date must be before or equal to end date");
        }
    }

    match (symbol, start, end, email) {
        (Some(symbol), Some(start_date), Some(end_date), Some(email)) if errors.is_empty() => {
            Ok(QuoteQuery {
                symbol_code: String::from(symbol),
                range: DateRange {
                    start_date,
                    end_date,
                },
                notify_address: String::from(email),
            })
        }
        _ => Err(errors),
    }
}

/// Re-check an assembled result: non-empty symbol, ordered range, every quote inside the
/// range, finite prices.
pub fn check_result_shape(result: &QuoteQueryResult) -> Result<(), QuoteError> {
    if result.symbol_code.trim().is_empty() {
        return Err(QuoteError::Internal(String::from("result has an empty symbol")));
    }
    if result.range.start_date > result.range.end_date {
        return Err(QuoteError::Internal(format!(
            "result range {}..{} is reversed",
            result.range.start_date, result.range.end_date
        )));
    }
    if let Some(quote) = result.quotes.iter().find(|q| !result.range.contains(q.date)) {
        return Err(QuoteError::Internal(format!(
            "quote dated {} lies outside {}..{}",
            quote.date, result.range.start_date, result.range.end_date
        )));
    }
    if let Some(quote) = result.quotes.iter().find(|q| !q.has_finite_prices()) {
        return Err(QuoteError::Internal(format!(
            "quote dated {} has a non-finite price",
            quote.date
        )));
    }
    Ok(())
}
