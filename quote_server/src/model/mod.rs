//! Read-side data sources of the quote server.
//!
//! - `json_file` — loading JSON datasets with missing/unreadable/malformed kept apart.
//! - `store` — per-symbol quote series (`RecordStore`, `JsonFileStore`).
//! - `directory` — reloadable in-memory symbol directory (`SymbolDirectory`).
//! - `refresh` — background thread that periodically reloads the directory.

pub mod directory;
pub mod json_file;
pub mod refresh;
pub mod store;
