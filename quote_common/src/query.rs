//! Quote query types: the inbound request, its validated form, and the result.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::quote::QuoteRecord;

/// Inbound request as sent by clients, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// Symbol code to query.
    pub symbol: String,
    /// First day of the range, `YYYY-MM-DD`.
    pub start_date: String,
    /// Last day of the range (inclusive), `YYYY-MM-DD`.
    pub end_date: String,
    /// Address that receives the query notification.
    pub email: String,
}

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First included day.
    pub start_date: NaiveDate,
    /// Last included day.
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Day after `end_date`, or `None` when `end_date` is the last representable day.
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.end_date.succ_opt()
    }

    /// True when `date` lies in `[start_date, end_date + 1 day)`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.start_date {
            return false;
        }
        match self.end_exclusive() {
            Some(bound) => date < bound,
            None => true,
        }
    }
}

/// Validated, normalized quote query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteQuery {
    /// Symbol code, non-empty.
    pub symbol_code: String,
    /// Requested range; `start_date <= end_date` always holds.
    pub range: DateRange,
    /// Notification address, syntactically valid.
    pub notify_address: String,
}

/// Successful answer to a quote query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQueryResult {
    /// Symbol code as requested.
    #[serde(rename = "symbol")]
    pub symbol_code: String,
    /// Resolved company name, or the symbol code when unknown.
    pub company_name: String,
    /// Echo of the requested range.
    pub range: DateRange,
    /// Records inside the range.
    pub quotes: Vec<QuoteRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange {
            start_date: day(2024, 10, 1),
            end_date: day(2024, 10, 2),
        };
        assert!(!range.contains(day(2024, 9, 30)));
        assert!(range.contains(day(2024, 10, 1)));
        assert!(range.contains(day(2024, 10, 2)));
        assert!(!range.contains(day(2024, 10, 3)));
    }

    #[test]
    fn end_bound_crosses_month_and_year() {
        let range = DateRange {
            start_date: day(2023, 12, 31),
            end_date: day(2023, 12, 31),
        };
        assert_eq!(range.end_exclusive(), Some(day(2024, 1, 1)));
        assert!(range.contains(day(2023, 12, 31)));
        assert!(!range.contains(day(2024, 1, 1)));
    }

    #[test]
    fn result_uses_wire_field_names() {
        let result = QuoteQueryResult {
            symbol_code: String::from("AAPL"),
            company_name: String::from("Apple Inc."),
            range: DateRange {
                start_date: day(2024, 10, 1),
                end_date: day(2024, 10, 2),
            },
            quotes: Vec::new(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["symbol"], "AAPL");
        assert_eq!(value["companyName"], "Apple Inc.");
        assert_eq!(value["range"]["startDate"], "2024-10-01");
        assert_eq!(value["range"]["endDate"], "2024-10-02");
        assert!(value["quotes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn request_reads_camel_case_fields() {
        let json = r#"{"symbol":"AAPL","startDate":"2024-10-01","endDate":"2024-10-02","email":"t@e.com"}"#;
        let request: QuoteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.start_date, "2024-10-01");
        assert_eq!(request.end_date, "2024-10-02");
    }
}
