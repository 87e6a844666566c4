//! Quote retrieval pipeline.
//!
//! `QuoteService::retrieve_with` runs, in order:
//! 1. validation of the raw request against the current UTC day,
//! 2. company name resolution through the [`SymbolDirectory`] (unknown symbols fall back
//!    to the symbol code),
//! 3. loading the stored series from the [`RecordStore`],
//! 4. inclusive date-range filtering,
//! 5. a shape check of the assembled result,
//! 6. handing the result to the caller's `respond` callback,
//! 7. queueing a notification on the [`NotificationDispatcher`].
//!
//! Steps 1–6 are synchronous; step 7 only enqueues and its outcome is never visible to
//! the caller.
use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, error};
use quote_common::dates::today_utc;
use quote_common::query::{DateRange, QuoteQueryResult};
use quote_common::quote::QuoteRecord;
use quote_common::validation::{check_result_shape, validate_quote_request};
use quote_common::{QuoteError, Result};
use serde_json::Value;

use crate::model::directory::SymbolDirectory;
use crate::model::store::RecordStore;
use crate::notifier::Notification;
use crate::notifier::dispatcher::NotificationDispatcher;

/// Records of `records` dated inside `range`, in their original order.
///
/// The input is not assumed to be sorted; every record is tested.
pub fn filter_range(records: &[QuoteRecord], range: &DateRange) -> Vec<QuoteRecord> {
    records
        .iter()
        .filter(|record| range.contains(record.date))
        .cloned()
        .collect()
}

/// Orchestrates validation, lookup, loading, filtering, and notification.
pub struct QuoteService {
    directory: Arc<SymbolDirectory>,
    store: Arc<dyn RecordStore>,
    notifications: NotificationDispatcher,
    clock: fn() -> NaiveDate,
}

impl QuoteService {
    /// Build a service that validates against the real UTC calendar.
    pub fn new(
        directory: Arc<SymbolDirectory>,
        store: Arc<dyn RecordStore>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            directory,
            store,
            notifications,
            clock: today_utc,
        }
    }

    /// Replace the source of "today" used for the not-in-the-future check.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// Run the pipeline and return the result.
    pub fn retrieve(&self, raw: &Value) -> Result<QuoteQueryResult> {
        self.retrieve_with(raw, QuoteQueryResult::clone)
    }

    /// Run the pipeline, pass the result to `respond`, then queue the notification.
    ///
    /// `respond` runs before anything is queued, so the notification can neither delay
    /// nor alter what the caller receives.
    pub fn retrieve_with<R>(
        &self,
        raw: &Value,
        respond: impl FnOnce(&QuoteQueryResult) -> R,
    ) -> Result<R> {
        let query = validate_quote_request(raw, (self.clock)()).map_err(QuoteError::Validation)?;
        debug!(
            "Quote query for {} from {} to {}",
            query.symbol_code, query.range.start_date, query.range.end_date
        );

        let company_name = self
            .directory
            .lookup_company_name(&query.symbol_code)?
            .unwrap_or_else(|| query.symbol_code.clone());

        let series = self.store.load_series(&query.symbol_code)?;
        let quotes = filter_range(&series, &query.range);

        let result = QuoteQueryResult {
            symbol_code: query.symbol_code.clone(),
            company_name,
            range: query.range,
            quotes,
        };
        if let Err(e) = check_result_shape(&result) {
            error!("Assembled result for {} failed its shape check: {}", query.symbol_code, e);
            return Err(e);
        }

        let reply = respond(&result);
        self.notifications
            .submit(Notification::for_query(&query, &result.company_name));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        FailingNotifier, Fixture, GatedNotifier, RecordingNotifier, aapl_rows, day,
    };
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn request(symbol: &str, start: &str, end: &str) -> Value {
        json!({ "symbol": symbol, "startDate": start, "endDate": end, "email": "t@e.com" })
    }

    fn quote_on(date: NaiveDate) -> QuoteRecord {
        QuoteRecord {
            date,
            open: 1.0,
            high: 2.0,
            low: 1.0,
            close: 2.0,
            volume: 5,
        }
    }

    #[test]
    fn serves_inclusive_range_with_company_name() {
        let fixture = Fixture::new();
        let (notifier, delivered) = RecordingNotifier::new();
        let service = fixture.service(Box::new(notifier));

        let result = service
            .retrieve(&request("AAPL", "2024-10-01", "2024-10-02"))
            .unwrap();
        assert_eq!(result.symbol_code, "AAPL");
        assert_eq!(result.company_name, "Apple Inc.");
        assert_eq!(result.quotes.len(), 2);
        assert!(result.quotes.iter().all(|q| result.range.contains(q.date)));

        let notification = delivered.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(notification.to, "t@e.com");
        assert_eq!(notification.subject, "Apple Inc.");
        assert_eq!(notification.body, "From 2024-10-01 to 2024-10-02");
    }

    #[test]
    fn single_day_range_returns_that_day_only() {
        let fixture = Fixture::new();
        let service = fixture.service(Box::new(RecordingNotifier::new().0));

        let result = service
            .retrieve(&request("AAPL", "2024-10-02", "2024-10-02"))
            .unwrap();
        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.quotes[0].date, day(2024, 10, 2));

        let empty = service
            .retrieve(&request("AAPL", "2024-09-15", "2024-09-15"))
            .unwrap();
        assert!(empty.quotes.is_empty());
    }

    #[test]
    fn missing_series_is_not_found_not_validation() {
        let fixture = Fixture::new();
        let (notifier, delivered) = RecordingNotifier::new();
        let service = fixture.service(Box::new(notifier));

        let err = service
            .retrieve(&request("NOPE", "2024-10-01", "2024-10-02"))
            .unwrap_err();
        assert!(matches!(err, QuoteError::SymbolDataNotFound(ref s) if s == "NOPE"));
        assert!(delivered.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn invalid_request_reports_all_fields() {
        let fixture = Fixture::new();
        let service = fixture.service(Box::new(RecordingNotifier::new().0));

        let raw = json!({ "symbol": "", "startDate": "2025-10-01", "endDate": "2024-01-01", "email": "bad" });
        match service.retrieve(&raw) {
            Err(QuoteError::Validation(errors)) => {
                assert!(errors.contains("symbol"));
                assert!(errors.contains("endDate"));
                assert!(errors.contains("email"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_company_echoes_symbol() {
        let fixture = Fixture::new();
        fixture.write_series("ZZZZ", &aapl_rows());
        let service = fixture.service(Box::new(RecordingNotifier::new().0));

        let result = service
            .retrieve(&request("ZZZZ", "2024-10-01", "2024-10-02"))
            .unwrap();
        assert_eq!(result.company_name, "ZZZZ");
    }

    #[test]
    fn notifier_failure_does_not_affect_result() {
        let fixture = Fixture::new();
        let (notifier, attempts) = FailingNotifier::new();
        let service = fixture.service(Box::new(notifier));

        let result = service
            .retrieve(&request("AAPL", "2024-10-01", "2024-10-02"))
            .unwrap();
        assert_eq!(result.quotes.len(), 2);
        assert_eq!(attempts.recv_timeout(Duration::from_secs(5)).unwrap(), "t@e.com");
    }

    #[test]
    fn hung_notifier_does_not_block_retrieval() {
        let fixture = Fixture::new();
        let (notifier, release) = GatedNotifier::new();
        let service = fixture.service(Box::new(notifier));

        let started = Instant::now();
        for _ in 0..3 {
            service
                .retrieve(&request("AAPL", "2024-10-01", "2024-10-02"))
                .unwrap();
        }
        assert!(started.elapsed() < Duration::from_secs(2));
        drop(release);
    }

    #[test]
    fn respond_runs_before_notification_is_queued() {
        let fixture = Fixture::new();
        let (notifier, delivered) = RecordingNotifier::new();
        let service = fixture.service(Box::new(notifier));

        let count = service
            .retrieve_with(&request("AAPL", "2024-10-01", "2024-10-02"), |result| {
                assert!(delivered.try_recv().is_err());
                result.quotes.len()
            })
            .unwrap();
        assert_eq!(count, 2);
        assert!(delivered.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn malformed_series_is_internal_data_error() {
        let fixture = Fixture::new();
        fixture.write_raw_series("AAPL", r#"[{"date":"2024-10-01","open":"high"}]"#);
        let service = fixture.service(Box::new(RecordingNotifier::new().0));

        assert!(matches!(
            service.retrieve(&request("AAPL", "2024-10-01", "2024-10-02")),
            Err(QuoteError::DataFormat(_))
        ));
    }

    #[test]
    fn uninitialized_directory_is_reported() {
        let fixture = Fixture::new();
        let service = fixture.service_with_directory(
            Arc::new(SymbolDirectory::new(fixture.symbols_path())),
            Box::new(RecordingNotifier::new().0),
        );
        assert!(matches!(
            service.retrieve(&request("AAPL", "2024-10-01", "2024-10-02")),
            Err(QuoteError::Uninitialized(_))
        ));
    }

    #[test]
    fn future_dates_rejected_against_injected_clock() {
        let fixture = Fixture::new();
        let service = fixture
            .service(Box::new(RecordingNotifier::new().0))
            .with_clock(|| day(2024, 10, 1));

        match service.retrieve(&request("AAPL", "2024-10-01", "2024-10-02")) {
            Err(QuoteError::Validation(errors)) => {
                assert_eq!(
                    errors.get("endDate"),
                    Some(&[String::from("Date cannot be in the future")][..])
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn filter_handles_unsorted_input_and_is_idempotent() {
        let records = vec![
            quote_on(day(2024, 10, 3)),
            quote_on(day(2024, 9, 30)),
            quote_on(day(2024, 10, 2)),
            quote_on(day(2024, 10, 1)),
            quote_on(day(2024, 10, 2)),
        ];
        let range = DateRange {
            start_date: day(2024, 10, 1),
            end_date: day(2024, 10, 2),
        };

        let once = filter_range(&records, &range);
        let dates: Vec<NaiveDate> = once.iter().map(|q| q.date).collect();
        assert_eq!(dates, vec![day(2024, 10, 2), day(2024, 10, 1), day(2024, 10, 2)]);
        assert_eq!(filter_range(&once, &range), once);
    }

    #[test]
    fn filter_includes_end_day_at_month_boundary() {
        let records = vec![
            quote_on(day(2024, 2, 28)),
            quote_on(day(2024, 2, 29)),
            quote_on(day(2024, 3, 1)),
        ];
        let range = DateRange {
            start_date: day(2024, 2, 29),
            end_date: day(2024, 2, 29),
        };
        let kept = filter_range(&records, &range);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, day(2024, 2, 29));
    }
}
