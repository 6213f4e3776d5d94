//! Conditional cross-field rules.
//!
//! A [`Conditional`] flags rows where every [`Condition`] holds but the
//! [`Requirement`] does not. Rows outside the antecedent are valid.

use std::collections::BTreeSet;

use buf_ingest::{TabularDocument, WorkingFrame, date_key};
use buf_model::CheckResult;
use chrono::NaiveDateTime;

use super::is_numeric;
use crate::error::RuleError;
use crate::rule::{Rule, RuleContext};

/// A row-level antecedent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The cell is one of `values`. A missing cell never matches.
    In {
        column: String,
        values: BTreeSet<String>,
    },
}

impl Condition {
    pub fn one_of<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    fn holds(&self, working: &WorkingFrame) -> Result<Vec<bool>, RuleError> {
        match self {
            Self::In { column, values } => Ok(working
                .column(column)?
                .into_iter()
                .map(|cell| cell.is_some_and(|value| values.contains(value)))
                .collect()),
        }
    }
}

/// What must hold for rows matching the antecedent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The cell is numeric (missing cells fail).
    Numeric { column: String },
    /// The cell is missing.
    Missing { column: String },
    /// The cell is present and not blank.
    Populated { column: String },
    /// The cell is one of `values`.
    In {
        column: String,
        values: BTreeSet<String>,
    },
    /// The date in `column` is not before the date in `other`.
    ///
    /// Reads the derived `<column>_dt` and `<other>_dt` columns. Rows where
    /// either cell is missing or either date did not parse are valid.
    DateNotBefore { column: String, other: String },
}

impl Requirement {
    fn reads(&self) -> Vec<String> {
        match self {
            Self::DateNotBefore { column, other } => vec![date_key(column), date_key(other)],
            _ => Vec::new(),
        }
    }

    fn holds(&self, working: &WorkingFrame) -> Result<Vec<bool>, RuleError> {
        match self {
            Self::Numeric { column } => cell_flags(working, column, |cell| {
                cell.is_some_and(is_numeric)
            }),
            Self::Missing { column } => cell_flags(working, column, |cell| cell.is_none()),
            Self::Populated { column } => cell_flags(working, column, |cell| {
                cell.is_some_and(|value| !value.is_empty())
            }),
            Self::In { column, values } => cell_flags(working, column, |cell| {
                cell.is_some_and(|value| values.contains(value))
            }),
            Self::DateNotBefore { column, other } => {
                let later = derived_dates(working, column)?;
                let earlier = derived_dates(working, other)?;
                let later_raw = working.column(column)?;
                let earlier_raw = working.column(other)?;
                Ok((0..working.height())
                    .map(|idx| {
                        if later_raw[idx].is_none() || earlier_raw[idx].is_none() {
                            return true;
                        }
                        match (later[idx], earlier[idx]) {
                            (Some(end), Some(start)) => start <= end,
                            _ => true,
                        }
                    })
                    .collect())
            }
        }
    }
}

fn cell_flags<F>(working: &WorkingFrame, column: &str, predicate: F) -> Result<Vec<bool>, RuleError>
where
    F: Fn(Option<&str>) -> bool,
{
    Ok(working.column(column)?.into_iter().map(predicate).collect())
}

fn derived_dates<'a>(
    working: &'a WorkingFrame,
    column: &str,
) -> Result<&'a [Option<NaiveDateTime>], RuleError> {
    let key = date_key(column);
    working
        .dates(&key)
        .ok_or(RuleError::MissingDerived { key })
}

/// If every condition in `when` holds, `then` must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditional {
    pub when: Vec<Condition>,
    pub then: Requirement,
}

impl Conditional {
    pub fn new(when: Vec<Condition>, then: Requirement) -> Self {
        Self { when, then }
    }
}

impl Rule for Conditional {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let flags = {
            let working = document.working()?;
            let mut applies = vec![true; working.height()];
            for condition in &self.when {
                for (applies, holds) in applies.iter_mut().zip(condition.holds(working)?) {
                    *applies &= holds;
                }
            }
            let satisfied = self.then.holds(working)?;
            applies
                .into_iter()
                .zip(satisfied)
                .map(|(applies, satisfied)| !applies || satisfied)
                .collect::<Vec<bool>>()
        };
        let result = CheckResult::from_flags(&flags);
        document.working_mut()?.set_flags(ctx.code, flags)?;
        Ok(result)
    }

    fn reads(&self) -> Vec<String> {
        self.then.reads()
    }
}
