// ==============================================================================
// error.rs - Error Taxonomy
// ==============================================================================
// Description: Errors raised while loading, merging and querying network data
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while building or querying a dataset
#[derive(Error, Debug)]
pub enum DataError {
    /// A declared file is missing or unreadable. Fatal to the current load.
    #[error("IO error reading {path:?}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file does not parse into the expected column shape. Fatal to the current load.
    #[error("Invalid format in {path:?} at line {line}: {details}")]
    Format {
        path: PathBuf,
        line: usize,
        details: String,
    },

    /// A query referenced a column the node table does not have
    #[error("Unknown column '{column}' (available: {available:?})")]
    Schema {
        column: String,
        available: Vec<String>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Operation exists in the API but is deliberately not implemented
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Checkpoint error: {0}")]
    Checkpoint(String),
}

pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        DataError::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn format(path: impl AsRef<Path>, line: usize, details: impl Into<String>) -> Self {
        DataError::Format {
            path: path.as_ref().to_path_buf(),
            line,
            details: details.into(),
        }
    }

    /// Map a csv error onto the taxonomy: IO problems stay IO, everything else is a format error
    pub(crate) fn from_csv(path: impl AsRef<Path>, err: csv::Error) -> Self {
        let line = err
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(0);

        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(source) => return DataError::io(path, source),
                other => return DataError::format(path, line, format!("{:?}", other)),
            }
        }

        DataError::format(path, line, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DataError::format("nodes.txt", 3, "Expected 2 fields, found 1");
        assert_eq!(
            err.to_string(),
            "Invalid format in \"nodes.txt\" at line 3: Expected 2 fields, found 1"
        );

        let err = DataError::Schema {
            column: "score".to_string(),
            available: vec!["NODEID".to_string()],
        };
        assert!(err.to_string().contains("'score'"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = DataError::io("/nope/edges.txt", source);

        match err {
            DataError::FileIo { path, source } => {
                assert_eq!(path, PathBuf::from("/nope/edges.txt"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            _ => panic!("Expected FileIo error"),
        }
    }
}
