//! In-memory symbol directory.
//!
//! The directory maps symbol codes to company names and keeps the denormalized lookup
//! list served to symbol pickers. Both are built together from one dataset file and kept
//! in an immutable [`DirectorySnapshot`].
//!
//! Concurrency model:
//! - Readers clone the current `Arc<DirectorySnapshot>` under a short read lock and then
//!   work on that snapshot without holding the lock.
//! - `load` parses the whole file first and only then swaps the `Arc` under the write
//!   lock, so a reader observes either the old snapshot or the new one, never a mix.
//! - A failed `load` leaves the current snapshot untouched.
//! - Reads before the first successful load fail with [`QuoteError::Uninitialized`].
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{debug, info, warn};
use quote_common::symbol::{SymbolLookupEntry, SymbolRecord};
use quote_common::{QuoteError, Result};
use serde_json::Value;

use crate::model::json_file::{JsonFileError, load_json};

/// One fully built, immutable version of the directory.
#[derive(Debug)]
pub struct DirectorySnapshot {
    entries: Vec<SymbolLookupEntry>,
    names: HashMap<String, String>,
}

impl DirectorySnapshot {
    fn from_records(records: &[SymbolRecord]) -> Self {
        let entries = records.iter().map(SymbolRecord::to_lookup_entry).collect();
        let mut names = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(previous) =
                names.insert(record.symbol_code.clone(), record.company_name.clone())
            {
                warn!(
                    "Duplicate symbol {} in directory; '{}' replaces '{}'",
                    record.symbol_code, record.company_name, previous
                );
            }
        }
        Self { entries, names }
    }

    /// Lookup entries in dataset order.
    pub fn entries(&self) -> &[SymbolLookupEntry] {
        &self.entries
    }

    /// Company name of `symbol_code`, if listed.
    pub fn company_name(&self, symbol_code: &str) -> Option<&str> {
        self.names.get(symbol_code).map(String::as_str)
    }

    /// Number of lookup entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the dataset held no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared, reloadable symbol directory.
pub struct SymbolDirectory {
    source: PathBuf,
    current: RwLock<Option<Arc<DirectorySnapshot>>>,
}

impl SymbolDirectory {
    /// Create an empty, not yet loaded directory reading from `source`.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            current: RwLock::new(None),
        }
    }

    /// Path of the dataset file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Re-read the dataset and swap in a new snapshot. Returns the number of records.
    ///
    /// Fails with `NotFound` when the file is absent and with `DataFormat` when it is not
    /// a JSON array of valid symbol records.
    pub fn load(&self) -> Result<usize> {
        let records = read_records(&self.source)?;
        self.replace(&records)
    }

    /// Swap in a snapshot built from `records`.
    pub fn replace(&self, records: &[SymbolRecord]) -> Result<usize> {
        let snapshot = Arc::new(DirectorySnapshot::from_records(records));
        let count = snapshot.len();
        *self.current.write()? = Some(snapshot);
        info!("Symbol directory loaded: {} symbols", count);
        Ok(count)
    }

    /// True once a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.current.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Result<Arc<DirectorySnapshot>> {
        self.current
            .read()?
            .as_ref()
            .map(Arc::clone)
            .ok_or(QuoteError::Uninitialized("symbol directory"))
    }

    /// Every lookup entry of the current snapshot.
    pub fn lookup_all(&self) -> Result<Vec<SymbolLookupEntry>> {
        Ok(self.snapshot()?.entries().to_vec())
    }

    /// Company name of `symbol_code`; `Ok(None)` for unknown symbols.
    pub fn lookup_company_name(&self, symbol_code: &str) -> Result<Option<String>> {
        Ok(self.snapshot()?.company_name(symbol_code).map(String::from))
    }
}

fn read_records(path: &Path) -> Result<Vec<SymbolRecord>> {
    debug!("Reading symbol directory from {}", path.display());
    let rows = match load_json::<Value>(path) {
        Ok(Value::Array(rows)) => rows,
        Ok(_) => {
            return Err(QuoteError::DataFormat(format!(
                "{}: expected an array of symbol records",
                path.display()
            )));
        }
        Err(JsonFileError::Missing) => {
            return Err(QuoteError::NotFound(path.display().to_string()));
        }
        Err(JsonFileError::Io(e)) => return Err(QuoteError::Io(e)),
        Err(JsonFileError::Format(message)) => return Err(QuoteError::DataFormat(message)),
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value::<SymbolRecord>(row).map_err(|e| {
                QuoteError::DataFormat(format!(
                    "{}: record {}: {}",
                    path.display(),
                    index,
                    e
                ))
            })
        })
        .collect()
}
