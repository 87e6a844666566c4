//! Error types shared between client and server.
//!
//! The `QuoteError` enum unifies the failure cases of the quote pipeline (validation,
//! missing data, malformed data, directory misuse) together with plumbing failures for
//! I/O, JSON, and locking, allowing crates to propagate a single error type.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

use crate::validation::FieldErrors;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library or sockets/files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The request failed validation; carries every offending field.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A required backing resource (e.g. the symbol directory file) is absent.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// No stored quote series exists for the requested symbol.
    #[error("No quote data for symbol: {0}")]
    SymbolDataNotFound(String),

    /// Stored data exists but could not be parsed into the expected records.
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// A cache was read before its first successful load.
    #[error("Not initialized: {0}")]
    Uninitialized(&'static str),

    /// Invalid or unparseable configuration value.
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed protocol message exchanged between client and server.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// An invariant of our own output was violated.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error indicating a poisoned lock was encountered.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::LockPoisoned(err.to_string())
    }
}

impl QuoteError {
    /// True for outcomes caused by the caller's input rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QuoteError::Validation(_) | QuoteError::SymbolDataNotFound(_)
        )
    }
}
