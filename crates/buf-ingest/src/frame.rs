//! Base and working frames.
//!
//! A [`Frame`] is a Polars `DataFrame` whose columns are all nullable
//! strings: `None` is a missing cell, `Some("")` a blank one. The
//! [`WorkingFrame`] wraps a copy of the base data plus the derived columns
//! checks attach to it, keyed by check code (flags) or by `<column>_dt`
//! (parsed dates).

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use crate::delimited::CsvTable;
use crate::error::{DocumentError, Result};

/// Suffix of derived date column keys.
pub const DATE_SUFFIX: &str = "_dt";

/// Key of the derived date column for `column`.
pub fn date_key(column: &str) -> String {
    format!("{column}{DATE_SUFFIX}")
}

/// Years a `%Y` field may hold: exactly four digits.
const FOUR_DIGIT_YEARS: RangeInclusive<i32> = 1000..=9999;

/// Parse `value` with a strftime-style `format`.
///
/// Formats without time fields yield midnight. `%Y` only accepts four-digit
/// years, so `01/31/24` does not parse as the year 24. Returns `None` when
/// the value does not match.
pub fn parse_date(value: &str, format: &str) -> Option<NaiveDateTime> {
    let parsed = NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;
    if format.contains("%Y") && !FOUR_DIGIT_YEARS.contains(&parsed.year()) {
        return None;
    }
    Some(parsed)
}

/// String-typed tabular data.
#[derive(Debug, Clone)]
pub struct Frame {
    data: DataFrame,
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}

impl Frame {
    /// A frame with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            data: DataFrame::empty(),
        }
    }

    /// Build a frame from parsed delimited text.
    pub fn from_table(table: CsvTable) -> Result<Self> {
        let columns: Vec<Column> = table
            .headers
            .into_iter()
            .zip(table.columns)
            .map(|(name, values)| Series::new(name.into(), values).into_column())
            .collect();
        Ok(Self {
            data: DataFrame::new(columns)?,
        })
    }

    /// Build a frame from `(name, cells)` pairs. Handy for tests and callers
    /// that already hold decoded data.
    pub fn from_columns<S: AsRef<str>>(columns: Vec<(S, Vec<Option<&str>>)>) -> Result<Self> {
        let columns: Vec<Column> = columns
            .into_iter()
            .map(|(name, values)| {
                let values: Vec<Option<String>> = values
                    .into_iter()
                    .map(|cell| cell.map(str::to_string))
                    .collect();
                Series::new(name.as_ref().into(), values).into_column()
            })
            .collect();
        Ok(Self {
            data: DataFrame::new(columns)?,
        })
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// Column labels in order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.as_str().to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let column = self
            .data
            .column(name)
            .map_err(|_| DocumentError::ColumnNotFound {
                column: name.to_string(),
            })?;
        Ok(column.str()?.into_iter().collect())
    }

    /// Every column's cells, column-major, in label order.
    pub fn columns(&self) -> Result<Vec<Vec<Option<&str>>>> {
        self.data
            .get_columns()
            .iter()
            .map(|column| Ok(column.str()?.into_iter().collect()))
            .collect()
    }

    /// Relabel every column.
    pub fn set_column_names(&mut self, names: &[String]) -> Result<()> {
        if names.len() != self.width() {
            return Err(DocumentError::ColumnCountMismatch {
                expected: names.len(),
                found: self.width(),
            });
        }
        self.data.set_column_names(names.iter().map(String::as_str))?;
        Ok(())
    }

    /// Relabel the first `names.len()` columns positionally; later columns
    /// keep their labels.
    pub fn rename_leading(&mut self, names: &[String]) -> Result<()> {
        if names.len() > self.width() {
            return Err(DocumentError::ColumnCountMismatch {
                expected: names.len(),
                found: self.width(),
            });
        }
        let current = self.column_names();
        let relabelled: Vec<String> = names
            .iter()
            .cloned()
            .chain(current.into_iter().skip(names.len()))
            .collect();
        self.data.set_column_names(relabelled.iter().map(String::as_str))?;
        Ok(())
    }

    /// Underlying Polars frame.
    pub fn as_dataframe(&self) -> &DataFrame {
        &self.data
    }
}

/// A column a check attached to the working frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedColumn {
    /// Per-row pass flags, keyed by check code.
    Flags(Vec<bool>),
    /// Parsed dates, keyed by `<column>_dt`.
    Dates(Vec<Option<NaiveDateTime>>),
}

impl DerivedColumn {
    pub fn len(&self) -> usize {
        match self {
            Self::Flags(values) => values.len(),
            Self::Dates(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutable view of a document: base data plus derived columns.
///
/// Derived columns are only ever added or overwritten, never removed, and
/// always have one entry per row.
#[derive(Debug, Clone)]
pub struct WorkingFrame {
    data: Frame,
    derived: Vec<(String, DerivedColumn)>,
}

impl WorkingFrame {
    pub fn new(data: Frame) -> Self {
        Self {
            data,
            derived: Vec::new(),
        }
    }

    /// The string-typed data columns.
    pub fn data(&self) -> &Frame {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    /// Cells of one data column.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        self.data.column(name)
    }

    pub fn has_derived(&self, key: &str) -> bool {
        self.derived.iter().any(|(name, _)| name == key)
    }

    pub fn derived(&self, key: &str) -> Option<&DerivedColumn> {
        self.derived
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, column)| column)
    }

    /// Derived keys in insertion order.
    pub fn derived_keys(&self) -> impl Iterator<Item = &str> {
        self.derived.iter().map(|(name, _)| name.as_str())
    }

    pub fn flags(&self, key: &str) -> Option<&[bool]> {
        match self.derived(key)? {
            DerivedColumn::Flags(values) => Some(values),
            DerivedColumn::Dates(_) => None,
        }
    }

    pub fn dates(&self, key: &str) -> Option<&[Option<NaiveDateTime>]> {
        match self.derived(key)? {
            DerivedColumn::Dates(values) => Some(values),
            DerivedColumn::Flags(_) => None,
        }
    }

    /// Attach (or overwrite) a derived column.
    pub fn set_derived(&mut self, key: impl Into<String>, column: DerivedColumn) -> Result<()> {
        let key = key.into();
        if column.len() != self.height() {
            return Err(DocumentError::RowCountMismatch {
                key,
                expected: self.height(),
                found: column.len(),
            });
        }
        match self.derived.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = column,
            None => self.derived.push((key, column)),
        }
        Ok(())
    }

    /// Attach per-row pass flags under a check code.
    pub fn set_flags(&mut self, key: impl Into<String>, flags: Vec<bool>) -> Result<()> {
        self.set_derived(key, DerivedColumn::Flags(flags))
    }

    /// Parse `column` into the derived date column `<column>_dt`.
    ///
    /// Skips parsing when that key already exists. Missing and unparsable
    /// cells become `None`. Returns the derived key.
    pub fn materialize_dates(&mut self, column: &str, format: &str) -> Result<String> {
        let key = date_key(column);
        if self.has_derived(&key) {
            return Ok(key);
        }
        let parsed: Vec<Option<NaiveDateTime>> = self
            .data
            .column(column)?
            .into_iter()
            .map(|cell| cell.and_then(|value| parse_date(value, format)))
            .collect();
        tracing::debug!(column, key = %key, "materialized date column");
        self.set_derived(key.clone(), DerivedColumn::Dates(parsed))?;
        Ok(key)
    }

    pub(crate) fn rename_leading(&mut self, names: &[String]) -> Result<()> {
        self.data.rename_leading(names)
    }

    /// Export data plus derived columns as one Polars frame: flags as
    /// booleans, dates as ISO-8601 text.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut df = self.data.as_dataframe().clone();
        for (key, column) in &self.derived {
            let series = match column {
                DerivedColumn::Flags(values) => Series::new(key.as_str().into(), values.clone()),
                DerivedColumn::Dates(values) => {
                    let text: Vec<Option<String>> = values
                        .iter()
                        .map(|value| value.map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
                        .collect();
                    Series::new(key.as_str().into(), text)
                }
            };
            df.with_column(series)?;
        }
        Ok(df)
    }
}
