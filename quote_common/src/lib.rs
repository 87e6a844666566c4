//!
//! Common types and utilities shared by the quote server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `dates` — strict `YYYY-MM-DD` parsing and the current UTC day.
//! - `quote` — stored daily `QuoteRecord`.
//! - `symbol` — symbol directory rows and their lookup projection.
//! - `query` — quote request, validated query, and result types.
//! - `validation` — multi-field request validation and result shape checks.
//! - `protocol` — line-delimited JSON envelopes exchanged between client and server.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod dates;
pub mod error;
pub mod net;
pub mod protocol;
pub mod query;
pub mod quote;
pub mod result;
pub mod symbol;
pub mod validation;

pub use error::QuoteError;
pub use result::Result;
pub use protocol::{Request, Response, Status};
