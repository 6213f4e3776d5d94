//! Validation report types.

use serde::Serialize;

use crate::{CheckResult, StageLevel};

/// One row of a validation report: a check's metadata plus its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Dense 0-based position in the report (not a stable key).
    pub index: usize,
    pub level: StageLevel,
    pub name: String,
    pub code: String,
    /// Description with catalog placeholders already filled in.
    pub description: String,
    #[serde(flatten)]
    pub result: CheckResult,
}

impl ReportRow {
    pub fn passed(&self) -> bool {
        self.result.passed()
    }
}

/// Ordered outcome of running a validator against one document.
///
/// Rows are in stage order, then check declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Validator type identifier (e.g. `BUF 1.0`).
    pub validator: String,
    /// Display path of the validated document.
    pub document: String,
    pub rows: Vec<ReportRow>,
    /// Stage whose failure stopped the run, if any.
    pub halted_at: Option<StageLevel>,
}

impl ValidationReport {
    pub fn new(validator: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            document: document.into(),
            rows: Vec::new(),
            halted_at: None,
        }
    }

    /// Append a stage's rows, renumbering them densely.
    pub fn extend_stage(&mut self, rows: Vec<ReportRow>) {
        let offset = self.rows.len();
        self.rows
            .extend(rows.into_iter().enumerate().map(|(idx, mut row)| {
                row.index = offset + idx;
                row
            }));
    }

    /// True when every row passed and no stage was skipped.
    pub fn passed(&self) -> bool {
        self.halted_at.is_none() && self.rows.iter().all(ReportRow::passed)
    }

    /// Stages that produced at least one row, in order.
    pub fn stages_run(&self) -> Vec<StageLevel> {
        let mut stages: Vec<StageLevel> = Vec::new();
        for row in &self.rows {
            if !stages.contains(&row.level) {
                stages.push(row.level);
            }
        }
        stages
    }

    /// Rows belonging to one stage.
    pub fn rows_for(&self, level: StageLevel) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(move |row| row.level == level)
    }

    /// Rows whose check failed.
    pub fn failed_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| !row.passed())
    }

    /// Sum of error counts across all rows.
    pub fn total_errors(&self) -> u64 {
        self.rows.iter().map(|row| row.result.error_count()).sum()
    }
}
