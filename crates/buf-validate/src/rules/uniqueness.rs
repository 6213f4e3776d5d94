//! Duplicate detection across key columns.

use std::collections::HashMap;

use buf_ingest::TabularDocument;
use buf_model::CheckResult;

use crate::column_reader::ColumnReader;
use crate::error::RuleError;
use crate::rule::{Rule, RuleContext};

/// No two rows share the same values in `columns`.
///
/// Every row of a duplicate set is flagged, not only the repeats. Missing
/// cells compare equal to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unique {
    pub columns: Vec<String>,
}

impl Unique {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// `true` for rows whose key occurs once.
pub fn unique_flags<K: Eq + std::hash::Hash>(keys: &[K]) -> Vec<bool> {
    let mut counts: HashMap<&K, usize> = HashMap::with_capacity(keys.len());
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    keys.iter().map(|key| counts[key] == 1).collect()
}

impl Rule for Unique {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let flags = {
            let working = document.working()?;
            let reader = ColumnReader::new(working.data());
            let columns = self
                .columns
                .iter()
                .map(|column| reader.cells(column))
                .collect::<Result<Vec<_>, _>>()?;
            let keys: Vec<Vec<Option<&str>>> = (0..reader.height())
                .map(|idx| columns.iter().map(|cells| cells[idx]).collect())
                .collect();
            unique_flags(&keys)
        };
        let result = CheckResult::from_flags(&flags);
        document.working_mut()?.set_flags(ctx.code, flags)?;
        Ok(result)
    }
}
