//! Ordered groups of checks.

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, ReportRow, StageLevel};

use crate::check::Check;
use crate::error::{Result, ValidateError};

/// The checks of one stage, in report order.
#[derive(Debug, Clone)]
pub struct CheckGroup {
    level: StageLevel,
    checks: Vec<Check>,
}

impl CheckGroup {
    pub fn new(level: StageLevel, checks: Vec<Check>) -> Self {
        Self { level, checks }
    }

    pub fn level(&self) -> StageLevel {
        self.level
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub(crate) fn checks_mut(&mut self) -> &mut [Check] {
        &mut self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Run every check in order. All checks run even after a failure; a
    /// rule error aborts the group.
    pub fn evaluate(
        &self,
        catalog: &CatalogData,
        document: &mut TabularDocument,
    ) -> Result<Vec<ReportRow>> {
        self.checks
            .iter()
            .enumerate()
            .map(|(index, check)| {
                let result = check
                    .evaluate(catalog, document)
                    .map_err(|source| ValidateError::Rule {
                        code: check.code().to_string(),
                        source,
                    })?;
                Ok(check.report_row(index, result))
            })
            .collect()
    }
}

/// True when every row passed.
pub fn all_passed(rows: &[ReportRow]) -> bool {
    rows.iter().all(ReportRow::passed)
}
