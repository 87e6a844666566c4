//! Reading JSON datasets from disk.
//!
//! Both the symbol directory and the per-symbol quote series are JSON files. Callers need
//! to tell three cases apart: the file is absent, the file could not be read, and the file
//! was read but is not the expected JSON. `load_json` keeps those apart so each caller can
//! map them to its own error.
use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failure while loading a JSON file.
#[derive(Error, Debug)]
pub enum JsonFileError {
    /// No file at the path.
    #[error("file not found")]
    Missing,
    /// The file exists but reading it failed.
    #[error("read failed: {0}")]
    Io(#[source] io::Error),
    /// The contents are not valid JSON of the expected shape.
    #[error("{0}")]
    Format(String),
}

/// Read and decode `path` as `T`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, JsonFileError> {
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => JsonFileError::Missing,
        _ => JsonFileError::Io(e),
    })?;
    serde_json::from_str(&text)
        .map_err(|e| JsonFileError::Format(format!("Invalid JSON in {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn distinguishes_missing_from_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");

        let missing = load_json::<Vec<u32>>(&path).unwrap_err();
        assert!(matches!(missing, JsonFileError::Missing));
        assert_eq!(missing.to_string(), "file not found");

        fs::write(&path, "{not-json").unwrap();
        match load_json::<Vec<u32>>(&path) {
            Err(JsonFileError::Format(message)) => assert!(message.contains("Invalid JSON")),
            other => panic!("expected format error, got {:?}", other),
        }

        fs::write(&path, "[1,2,3]").unwrap();
        assert_eq!(load_json::<Vec<u32>>(&path).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn directory_path_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_json::<Vec<u32>>(dir.path()),
            Err(JsonFileError::Io(_))
        ));
    }
}
