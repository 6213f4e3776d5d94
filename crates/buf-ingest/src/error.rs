//! Error types for document ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, parsing or mutating a document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentError {
    // === File System Errors ===
    /// Failed to read the upload from disk.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// The bytes could not be parsed as delimited text although the file
    /// has the expected type.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: String,
        #[source]
        source: Box<DocumentError>,
    },

    /// The delimited text could not be tokenized.
    #[error("malformed delimited text: {0}")]
    Delimited(#[from] csv::Error),

    /// A record has more fields than the header row.
    #[error("expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// The text has no header row.
    #[error("no columns to parse from file")]
    NoColumns,

    // === Frame Errors ===
    /// Column not found in the frame.
    #[error("column '{column}' not found in frame")]
    ColumnNotFound { column: String },

    /// Column relabelling with the wrong number of names.
    #[error("cannot rename {found} columns to {expected} canonical names")]
    ColumnCountMismatch { expected: usize, found: usize },

    /// Canonical column names were already applied.
    #[error("columns of {path} were already renamed")]
    AlreadyRenamed { path: String },

    /// A derived column does not have one entry per row.
    #[error("derived column '{key}' has {found} rows, frame has {expected}")]
    RowCountMismatch {
        key: String,
        expected: usize,
        found: usize,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for DocumentError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;
