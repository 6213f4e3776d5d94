//! Cell-content rules.
//!
//! Each rule flags every row of the working frame under the check code.
//! Rules that look at a single column read it from the working frame, which
//! carries canonical column names once the file stage has passed.

use std::collections::BTreeSet;

use buf_ingest::{TabularDocument, date_key};
use buf_model::{CatalogData, CheckResult, Offender};

use super::{flag_column, full_match, is_alphanumeric, is_numeric};
use crate::column_reader::ColumnReader;
use crate::error::RuleError;
use crate::rule::{Rule, RuleContext};

/// Comment attached to failed blank-cell checks.
pub const BLANK_ADVICE: &str = "Replace blank values with NULL.";

/// No cell of the base frame is blank. Missing cells are fine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlankCells;

impl Rule for NoBlankCells {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let (base, working) = document.frames_mut()?;
        let flags = ColumnReader::new(base).row_flags(|row| !row.contains(&Some("")))?;
        let result = CheckResult::from_flags(&flags);
        working.set_flags(ctx.code, flags)?;
        if result.passed() {
            return Ok(result);
        }
        Ok(result.with_comment(BLANK_ADVICE))
    }
}

/// Every non-missing cell of the base frame fully matches the catalog's
/// `valid_string` pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermittedCharacters;

impl Rule for PermittedCharacters {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let pattern = full_match(&ctx.catalog.valid_string)?;
        let valid = |cell: &str| pattern.is_match(cell);

        let (base, working) = document.frames_mut()?;
        let reader = ColumnReader::new(base);
        let flags = reader.row_flags(|row| row.iter().flatten().all(|cell| valid(*cell)))?;
        let result = CheckResult::from_flags(&flags);
        working.set_flags(ctx.code, flags)?;
        if result.passed() {
            return Ok(result);
        }

        let invalid = reader.collect_unique_matching(|cell| !cell.is_empty() && !valid(cell))?;
        Ok(result.with_values(invalid.into_iter().map(Offender::Value).collect()))
    }

    fn check_config(&self, catalog: &CatalogData) -> Result<(), RuleError> {
        full_match(&catalog.valid_string).map(|_| ())
    }
}

/// Cells of `column` are numeric. Missing cells pass only when
/// `allow_missing` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numeric {
    pub column: String,
    pub allow_missing: bool,
}

impl Numeric {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            allow_missing: false,
        }
    }

    pub fn or_missing(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            allow_missing: true,
        }
    }
}

impl Rule for Numeric {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let allow_missing = self.allow_missing;
        flag_column(ctx, document, &self.column, |cell| match cell {
            Some(value) => is_numeric(value),
            None => allow_missing,
        })
    }
}

/// Cells of `column` are made of letters and digits. Missing cells pass;
/// blank cells do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphanumeric {
    pub column: String,
}

impl Alphanumeric {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Rule for Alphanumeric {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        flag_column(ctx, document, &self.column, |cell| {
            cell.is_none_or(is_alphanumeric)
        })
    }
}

/// Cells of `column` are missing or parse with the catalog's `date_format`.
///
/// Writes the parsed dates to the derived column `<column>_dt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pub column: String,
}

impl DateFormat {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Rule for DateFormat {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let key = document.materialize_date_column(&self.column, &ctx.catalog.date_format)?;
        let working = document.working_mut()?;
        let dates = working
            .dates(&key)
            .ok_or_else(|| RuleError::MissingDerived { key: key.clone() })?;
        let cells = working.column(&self.column)?;

        let flags: Vec<bool> = cells
            .iter()
            .zip(dates)
            .map(|(cell, date)| cell.is_none() || date.is_some())
            .collect();
        let offenders: Vec<(usize, Option<String>)> = cells
            .iter()
            .zip(&flags)
            .enumerate()
            .filter(|(_, (_, ok))| !**ok)
            .map(|(idx, (cell, _))| (idx, cell.map(str::to_string)))
            .collect();

        working.set_flags(ctx.code, flags)?;
        Ok(CheckResult::from_offenders(offenders))
    }

    fn writes(&self) -> Vec<String> {
        vec![date_key(&self.column)]
    }
}

/// Cells of `column` are one of `values`. Missing cells fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InSet {
    pub column: String,
    pub values: BTreeSet<String>,
}

impl InSet {
    pub fn new<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl Rule for InSet {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        flag_column(ctx, document, &self.column, |cell| {
            cell.is_some_and(|value| self.values.contains(value))
        })
    }
}
