//! Checks: a rule plus the metadata reported with its result.

use std::sync::Arc;

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, CheckResult, ReportRow, StageLevel};

use crate::error::{RuleError, TemplateError};
use crate::rule::{Rule, RuleContext};
use crate::template;

/// A named, coded rule assigned to a stage.
#[derive(Debug, Clone)]
pub struct Check {
    level: StageLevel,
    name: String,
    code: String,
    template: String,
    description: String,
    rule: Arc<dyn Rule>,
    extra_reads: Vec<String>,
}

impl Check {
    /// Create a check. `description` may contain `{placeholder}`s that are
    /// filled from catalog data when the check is bound.
    pub fn new(
        level: StageLevel,
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        rule: Arc<dyn Rule>,
    ) -> Self {
        let template = description.into();
        Self {
            level,
            name: name.into(),
            code: code.into(),
            description: template.clone(),
            template,
            rule,
            extra_reads: Vec::new(),
        }
    }

    /// Declare derived columns the check reads beyond those its rule
    /// declares.
    #[must_use]
    pub fn with_reads<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_reads.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn level(&self) -> StageLevel {
        self.level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Description as configured, placeholders unrendered.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Rendered description (the template until bound).
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn rule(&self) -> &Arc<dyn Rule> {
        &self.rule
    }

    /// Derived columns read by this check.
    pub fn reads(&self) -> Vec<String> {
        let mut reads = self.rule.reads();
        reads.extend(self.extra_reads.iter().cloned());
        reads
    }

    /// Derived columns written by this check: its own flag column plus
    /// whatever its rule adds.
    pub fn writes(&self) -> Vec<String> {
        let mut writes = vec![self.code.clone()];
        writes.extend(self.rule.writes());
        writes
    }

    pub(crate) fn render(&mut self, catalog: &CatalogData) -> Result<(), TemplateError> {
        self.description = template::render(&self.template, |key| catalog.placeholder(key))?;
        Ok(())
    }

    /// Run the rule. Rule errors are returned as-is, never turned into a
    /// failed result.
    pub fn evaluate(
        &self,
        catalog: &CatalogData,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let ctx = RuleContext::new(&self.code, catalog);
        let result = self.rule.evaluate(&ctx, document)?;
        tracing::debug!(
            code = %self.code,
            passed = result.passed(),
            error_count = result.error_count(),
            "evaluated check"
        );
        Ok(result)
    }

    /// Pair a result with this check's metadata.
    pub fn report_row(&self, index: usize, result: CheckResult) -> ReportRow {
        ReportRow {
            index,
            level: self.level,
            name: self.name.clone(),
            code: self.code.clone(),
            description: self.description.clone(),
            result,
        }
    }
}
