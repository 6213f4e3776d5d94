//! Data model types for the BUF upload validator.
//!
//! This crate holds the values that flow between the document layer, the
//! check engine and the presentation edge:
//!
//! - [`CheckResult`]: the outcome of a single check, built only through
//!   invariant-preserving recipes
//! - [`StageLevel`]: the File / Data / Logic validation stages
//! - [`ReportRow`] and [`ValidationReport`]: the ordered output of a run
//! - [`CatalogData`]: the per-document-type configuration contract
//! - [`FileType`]: extension + detected encoding of an upload

mod catalog;
mod file_type;
mod outcome;
mod report;
mod stage;

pub use catalog::CatalogData;
pub use file_type::FileType;
pub use outcome::{CheckResult, ColumnMismatch, Offender};
pub use report::{ReportRow, ValidationReport};
pub use stage::StageLevel;
