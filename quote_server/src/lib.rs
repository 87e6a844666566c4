//! Historical quote server.
//!
//! Serves stored daily quote series for a symbol and date range over a line-delimited
//! JSON protocol on TCP. The building blocks:
//!
//! - `model::directory::SymbolDirectory` — in-memory symbol → company name cache, loaded
//!   once before the receiver starts and atomically swapped on reload.
//! - `model::store::JsonFileStore` — one JSON series file per symbol, read per request.
//! - `service::QuoteService` — validation, lookup, loading, inclusive range filtering,
//!   result checks, then a queued notification.
//! - `notifier` — best-effort mail notification on a worker thread; failures are logged.
//! - `handler::RequestHandler` — maps requests to operations and errors to statuses.
//! - `receiver::QuoteReceiver` — TCP accept loop, one thread per connection.
//!
//! Errors are surfaced as `QuoteError`; only validation and missing-series outcomes are
//! reported to clients in detail.
#![warn(missing_docs)]
pub mod config;
pub mod handler;
pub mod model;
pub mod notifier;
pub mod receiver;
pub mod service;

#[cfg(test)]
mod test_support;
