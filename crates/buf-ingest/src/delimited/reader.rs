//! Comma-delimited text reading with a single header row.

use csv::ReaderBuilder;

use super::header::{cell_value, unique_headers};
use crate::error::{DocumentError, Result};

/// Parsed delimited text, stored column-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    /// Unique header labels.
    pub headers: Vec<String>,
    /// One vector per header; `None` marks a missing cell.
    pub columns: Vec<Vec<Option<String>>>,
}

impl CsvTable {
    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }
}

/// Parse text with a header row into string-typed columns.
///
/// Rows shorter than the header are padded with missing cells; rows longer
/// than the header are an error, as is text with no header at all.
pub fn parse_delimited(text: &str) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].is_empty()) {
        return Err(DocumentError::NoColumns);
    }

    let headers = unique_headers(raw_headers.iter());
    let width = headers.len();
    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

    for record in reader.records() {
        let record = record?;
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }
        if record.len() > width {
            return Err(DocumentError::RaggedRow {
                line: record.position().map_or(0, csv::Position::line),
                expected: width,
                found: record.len(),
            });
        }
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(record.get(idx).and_then(cell_value));
        }
    }

    Ok(CsvTable { headers, columns })
}
