//! Per-symbol quote series storage.
//!
//! Each symbol's history lives in its own JSON file, `<quotes_dir>/<SYMBOL>.json`, holding
//! an array of [`QuoteRecord`]s. The store is read-only; a missing file is the only
//! condition reported as [`QuoteError::SymbolDataNotFound`].
use std::path::{Path, PathBuf};

use log::debug;
use quote_common::quote::QuoteRecord;
use quote_common::{QuoteError, Result};

use crate::model::json_file::{JsonFileError, load_json};

/// Read access to stored quote series.
pub trait RecordStore: Send + Sync {
    /// Load the full series for `symbol_code`, in stored order.
    fn load_series(&self, symbol_code: &str) -> Result<Vec<QuoteRecord>>;
}

/// `RecordStore` backed by one JSON file per symbol.
pub struct JsonFileStore {
    quotes_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `quotes_dir`.
    pub fn new(quotes_dir: impl Into<PathBuf>) -> Self {
        Self {
            quotes_dir: quotes_dir.into(),
        }
    }

    /// Directory the series files are read from.
    pub fn quotes_dir(&self) -> &Path {
        &self.quotes_dir
    }

    /// File holding the series of `symbol_code`, or `None` if the code could
    /// address anything outside the quotes directory.
    fn series_path(&self, symbol_code: &str) -> Option<PathBuf> {
        let addressable = !symbol_code.is_empty()
            && symbol_code != "."
            && !symbol_code.contains("..")
            && !symbol_code.contains(['/', '\\', '\0']);
        addressable.then(|| self.quotes_dir.join(format!("{}.json", symbol_code)))
    }
}

impl RecordStore for JsonFileStore {
    fn load_series(&self, symbol_code: &str) -> Result<Vec<QuoteRecord>> {
        let path = self
            .series_path(symbol_code)
            .ok_or_else(|| QuoteError::SymbolDataNotFound(String::from(symbol_code)))?;
        debug!("Loading quote series from {}", path.display());

        match load_json::<Vec<QuoteRecord>>(&path) {
            Ok(series) => Ok(series),
            Err(JsonFileError::Missing) => Err(QuoteError::SymbolDataNotFound(String::from(symbol_code))),
            Err(JsonFileError::Io(e)) => Err(QuoteError::Io(e)),
            Err(JsonFileError::Format(message)) => Err(QuoteError::DataFormat(message)),
        }
    }
}
