//! Delimited-text parsing into string-typed columns.

mod header;
mod reader;

pub use header::{NULL_TOKENS, cell_value, unique_headers};
pub use reader::{CsvTable, parse_delimited};
