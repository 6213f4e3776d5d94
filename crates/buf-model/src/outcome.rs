//! Check outcome types.
//!
//! A [`CheckResult`] can only be built through the recipes below, each of
//! which keeps `passed == (error_count == 0)` and only carries offending
//! values / row indices when something failed.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// A positional disagreement between the expected and received column headers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnMismatch {
    /// 1-based column position.
    pub position: usize,
    /// Catalog column name at this position (None if the file has extra columns).
    pub expected: Option<String>,
    /// Header found in the file (None if the file is missing columns).
    pub received: Option<String>,
}

impl ColumnMismatch {
    pub fn new(position: usize, expected: Option<&str>, received: Option<&str>) -> Self {
        Self {
            position,
            expected: expected.map(str::to_string),
            received: received.map(str::to_string),
        }
    }
}

impl fmt::Display for ColumnMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = self.expected.as_deref().unwrap_or("<none>");
        let received = self.received.as_deref().unwrap_or("<none>");
        write!(
            f,
            "#{}: expected '{}', received '{}'",
            self.position, expected, received
        )
    }
}

/// A single offending value reported by a failed check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Offender {
    /// A cell (or file-level) value.
    Value(String),
    /// A missing cell (`NULL` in the upload).
    Missing,
    /// A column header mismatch.
    Column(ColumnMismatch),
}

impl Offender {
    /// Build an offender from a possibly-missing cell.
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            Some(value) => Self::Value(value.to_string()),
            None => Self::Missing,
        }
    }
}

impl From<&str> for Offender {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

impl From<String> for Offender {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl fmt::Display for Offender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offender::Value(value) => f.write_str(value),
            Offender::Missing => f.write_str("NULL"),
            Offender::Column(mismatch) => mismatch.fmt(f),
        }
    }
}

/// Outcome of evaluating one check against a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    passed: bool,
    error_count: u64,
    values: Option<Vec<Offender>>,
    row_indices: Option<Vec<usize>>,
    comment: Option<String>,
}

impl CheckResult {
    /// A passing result with no errors.
    pub fn pass() -> Self {
        Self {
            passed: true,
            error_count: 0,
            values: None,
            row_indices: None,
            comment: None,
        }
    }

    /// Project a per-row boolean column: `false` marks an offending row.
    pub fn from_flags(flags: &[bool]) -> Self {
        let failing: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter_map(|(idx, ok)| (!ok).then_some(idx))
            .collect();
        if failing.is_empty() {
            return Self::pass();
        }
        Self {
            passed: false,
            error_count: failing.len() as u64,
            values: None,
            row_indices: Some(failing),
            comment: None,
        }
    }

    /// Project a single boolean (error count is 0 or 1).
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            return Self::pass();
        }
        Self {
            passed: false,
            error_count: 1,
            values: None,
            row_indices: None,
            comment: None,
        }
    }

    /// Project already-filtered offending cells as `(row, cell)` pairs.
    ///
    /// Values are de-duplicated in order of first appearance; row indices are
    /// kept for every offender.
    pub fn from_offenders<I>(offenders: I) -> Self
    where
        I: IntoIterator<Item = (usize, Option<String>)>,
    {
        let mut rows = Vec::new();
        let mut values = Vec::new();
        let mut seen: HashSet<Option<String>> = HashSet::new();
        for (row, cell) in offenders {
            rows.push(row);
            if seen.insert(cell.clone()) {
                values.push(match cell {
                    Some(value) => Offender::Value(value),
                    None => Offender::Missing,
                });
            }
        }
        if rows.is_empty() {
            return Self::pass();
        }
        Self {
            passed: false,
            error_count: rows.len() as u64,
            values: Some(values),
            row_indices: Some(rows),
            comment: None,
        }
    }

    /// Project a list of column mismatch records (kept as-is, not de-duplicated).
    pub fn from_mismatches(mismatches: Vec<ColumnMismatch>) -> Self {
        if mismatches.is_empty() {
            return Self::pass();
        }
        Self {
            passed: false,
            error_count: mismatches.len() as u64,
            values: Some(mismatches.into_iter().map(Offender::Column).collect()),
            row_indices: None,
            comment: None,
        }
    }

    /// Attach offending values. Ignored on passing results.
    #[must_use]
    pub fn with_values(mut self, values: Vec<Offender>) -> Self {
        if !self.passed && !values.is_empty() {
            self.values = Some(values);
        }
        self
    }

    /// Attach a free-text comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    pub fn values(&self) -> Option<&[Offender]> {
        self.values.as_deref()
    }

    pub fn row_indices(&self) -> Option<&[usize]> {
        self.row_indices.as_deref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_all_true() {
        let result = CheckResult::from_flags(&[true, true, true]);
        assert!(result.passed());
        assert_eq!(result.error_count(), 0);
        assert!(result.row_indices().is_none());
    }

    #[test]
    fn test_from_flags_with_failures() {
        let result = CheckResult::from_flags(&[true, false, false]);
        assert!(!result.passed());
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.row_indices(), Some(&[1, 2][..]));
        assert!(result.values().is_none());
    }

    #[test]
    fn test_from_flags_empty_column_passes() {
        let result = CheckResult::from_flags(&[]);
        assert!(result.passed());
    }

    #[test]
    fn test_from_bool() {
        assert_eq!(CheckResult::from_bool(true).error_count(), 0);
        let failed = CheckResult::from_bool(false);
        assert!(!failed.passed());
        assert_eq!(failed.error_count(), 1);
    }

    #[test]
    fn test_from_offenders_dedupes_values_in_order() {
        let result = CheckResult::from_offenders(vec![
            (0, Some("x".to_string())),
            (2, None),
            (3, Some("y".to_string())),
            (5, Some("x".to_string())),
        ]);
        assert_eq!(result.error_count(), 4);
        assert_eq!(
            result.values(),
            Some(&[Offender::from("x"), Offender::Missing, Offender::from("y")][..])
        );
        assert_eq!(result.row_indices(), Some(&[0, 2, 3, 5][..]));
    }

    #[test]
    fn test_from_mismatches_keeps_every_record() {
        let mismatch = ColumnMismatch::new(3, Some("c"), Some("d"));
        let result = CheckResult::from_mismatches(vec![mismatch.clone(), mismatch]);
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.values().map(<[Offender]>::len), Some(2));
        assert!(result.row_indices().is_none());
    }

    #[test]
    fn test_with_values_ignored_when_passing() {
        let result = CheckResult::pass().with_values(vec![Offender::from("a")]);
        assert!(result.values().is_none());
    }

    #[test]
    fn test_offender_serializes_untagged() {
        let values = vec![
            Offender::from(".txt"),
            Offender::Missing,
            Offender::Column(ColumnMismatch::new(1, Some("a"), None)),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"[".txt",null,{"position":1,"expected":"a","received":null}]"#
        );
    }

    #[test]
    fn test_mismatch_display() {
        let mismatch = ColumnMismatch::new(3, Some("c"), Some("d"));
        assert_eq!(mismatch.to_string(), "#3: expected 'c', received 'd'");
    }
}
