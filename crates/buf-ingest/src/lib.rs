//! Document ingestion for the BUF upload validator.
//!
//! Turns uploaded bytes into string-typed frames:
//!
//! - [`encoding`]: encoding detection and primary/fallback decoding
//! - [`delimited`]: comma-delimited parsing with missing/blank cell handling
//! - [`Frame`] / [`WorkingFrame`]: the base data and its annotated copy
//! - [`TabularDocument`]: one upload with lazily parsed frames

pub mod delimited;
pub mod document;
pub mod encoding;
pub mod error;
pub mod frame;

pub use delimited::{CsvTable, NULL_TOKENS, parse_delimited};
pub use document::TabularDocument;
pub use encoding::{Decoded, FALLBACK_ENCODING, decode, detect_encoding};
pub use error::{DocumentError, Result};
pub use frame::{DATE_SUFFIX, DerivedColumn, Frame, WorkingFrame, date_key, parse_date};
