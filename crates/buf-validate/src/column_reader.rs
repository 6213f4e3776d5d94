//! Column reader utilities for rules.
//!
//! `ColumnReader` wraps a [`Frame`] and turns the per-cell predicates rules
//! are written in into per-row flags and offender lists:
//!
//! - Column access by name (a missing column is a rule error)
//! - Row flags from a cell predicate or a whole-row predicate
//! - Offending `(row, cell)` pairs for failed flags
//! - Distinct cell values matching a predicate, column-major
//!
//! # Example
//!
//! ```ignore
//! let reader = ColumnReader::new(working.data());
//! let flags = reader.flags("activeFlag", |cell| matches!(cell, Some("0" | "1")))?;
//! let offenders = reader.offenders("activeFlag", &flags)?;
//! ```

use std::collections::HashSet;

use buf_ingest::Frame;

use crate::error::RuleError;

/// Read access to a frame's string cells for rule evaluation.
#[derive(Debug, Clone, Copy)]
pub struct ColumnReader<'a> {
    frame: &'a Frame,
}

impl<'a> ColumnReader<'a> {
    #[inline]
    pub fn new(frame: &'a Frame) -> Self {
        Self { frame }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.frame.has_column(name)
    }

    /// Cells of one column; `None` is a missing cell.
    pub fn cells(&self, column: &str) -> Result<Vec<Option<&'a str>>, RuleError> {
        Ok(self.frame.column(column)?)
    }

    /// One flag per row: `predicate` applied to the column's cell.
    pub fn flags<F>(&self, column: &str, predicate: F) -> Result<Vec<bool>, RuleError>
    where
        F: Fn(Option<&str>) -> bool,
    {
        Ok(self.cells(column)?.into_iter().map(predicate).collect())
    }

    /// One flag per row: `predicate` applied to all of the row's cells.
    pub fn row_flags<F>(&self, predicate: F) -> Result<Vec<bool>, RuleError>
    where
        F: Fn(&[Option<&str>]) -> bool,
    {
        let columns = self.frame.columns()?;
        let mut row: Vec<Option<&str>> = Vec::with_capacity(columns.len());
        let mut flags = Vec::with_capacity(self.height());
        for idx in 0..self.height() {
            row.clear();
            row.extend(columns.iter().map(|column| column[idx]));
            flags.push(predicate(&row));
        }
        Ok(flags)
    }

    /// `(row, cell)` pairs of the column for every `false` flag.
    pub fn offenders(
        &self,
        column: &str,
        flags: &[bool],
    ) -> Result<Vec<(usize, Option<String>)>, RuleError> {
        Ok(self
            .cells(column)?
            .into_iter()
            .zip(flags)
            .enumerate()
            .filter(|(_, (_, ok))| !**ok)
            .map(|(idx, (cell, _))| (idx, cell.map(str::to_string)))
            .collect())
    }

    /// Distinct non-missing values across all columns, walking column by
    /// column, for which `predicate` holds. Order is first appearance.
    pub fn collect_unique_matching<F>(&self, predicate: F) -> Result<Vec<String>, RuleError>
    where
        F: Fn(&str) -> bool,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut values = Vec::new();
        for column in self.frame.columns()? {
            for value in column.into_iter().flatten() {
                if predicate(value) && seen.insert(value) {
                    values.push(value.to_string());
                }
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        Frame::from_columns(vec![
            ("flag", vec![Some("1"), Some("2"), None, Some("0")]),
            ("name", vec![Some("x y"), Some(""), Some("ok"), Some("x y")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_flags_and_offenders() {
        let frame = frame();
        let reader = ColumnReader::new(&frame);
        let flags = reader
            .flags("flag", |cell| matches!(cell, Some("0" | "1")))
            .unwrap();
        assert_eq!(flags, vec![true, false, false, true]);
        assert_eq!(
            reader.offenders("flag", &flags).unwrap(),
            vec![(1, Some("2".to_string())), (2, None)]
        );
    }

    #[test]
    fn test_row_flags() {
        let frame = frame();
        let reader = ColumnReader::new(&frame);
        let flags = reader
            .row_flags(|row| !row.contains(&Some("")))
            .unwrap();
        assert_eq!(flags, vec![true, false, true, true]);
    }

    #[test]
    fn test_collect_unique_matching_is_column_major() {
        let frame = frame();
        let reader = ColumnReader::new(&frame);
        let values = reader
            .collect_unique_matching(|value| value != "1")
            .unwrap();
        assert_eq!(values, vec!["2", "0", "x y", "", "ok"]);
    }

    #[test]
    fn test_missing_column_is_error() {
        let frame = frame();
        let reader = ColumnReader::new(&frame);
        assert!(!reader.has_column("nope"));
        assert!(matches!(
            reader.cells("nope"),
            Err(RuleError::Document(_))
        ));
    }

    #[test]
    fn test_empty_frame() {
        let frame = Frame::empty();
        let reader = ColumnReader::new(&frame);
        assert_eq!(reader.height(), 0);
        assert!(reader.row_flags(|_| false).unwrap().is_empty());
        assert!(reader.collect_unique_matching(|_| true).unwrap().is_empty());
    }
}
