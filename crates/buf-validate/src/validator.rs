//! Validators: catalog data plus three staged check groups.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, StageLevel, ValidationReport};

use crate::check::Check;
use crate::error::{Result, RuleError, ValidateError};
use crate::group::{CheckGroup, all_passed};

/// Hook run on a document before the file stage.
pub type Preprocess =
    Arc<dyn Fn(&mut TabularDocument) -> std::result::Result<(), RuleError> + Send + Sync>;

/// A bound, ready-to-run validator for one document type.
///
/// Runs the file stage, stops if anything failed, relabels the columns with
/// the catalog's canonical names, runs the data stage, stops if anything
/// failed, then runs the logic stage.
#[derive(Clone)]
pub struct Validator {
    kind: String,
    catalog: Arc<CatalogData>,
    preprocess: Option<Preprocess>,
    file: CheckGroup,
    data: CheckGroup,
    logic: CheckGroup,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("kind", &self.kind)
            .field("catalog", &self.catalog)
            .field("preprocess", &self.preprocess.is_some())
            .field("file", &self.file)
            .field("data", &self.data)
            .field("logic", &self.logic)
            .finish()
    }
}

impl Validator {
    /// Bind checks to catalog data.
    ///
    /// Checks are grouped by stage, keeping their relative order. Every
    /// description is rendered once, every rule checks its configuration,
    /// and every derived column a check reads must be written by a check of
    /// an earlier stage.
    pub fn bind(
        kind: impl Into<String>,
        catalog: impl Into<Arc<CatalogData>>,
        checks: Vec<Check>,
    ) -> Result<Self> {
        let kind = kind.into();
        let catalog = catalog.into();

        let mut codes = HashSet::new();
        let mut staged: [Vec<Check>; 3] = Default::default();
        for mut check in checks {
            if !codes.insert(check.code().to_string()) {
                return Err(ValidateError::DuplicateCode {
                    code: check.code().to_string(),
                });
            }
            check
                .render(&catalog)
                .map_err(|source| ValidateError::Template {
                    code: check.code().to_string(),
                    source,
                })?;
            check
                .rule()
                .check_config(&catalog)
                .map_err(|source| ValidateError::Config {
                    code: check.code().to_string(),
                    source,
                })?;
            let slot = match check.level() {
                StageLevel::File => 0,
                StageLevel::Data => 1,
                StageLevel::Logic => 2,
            };
            staged[slot].push(check);
        }

        let [file, data, logic] = staged;
        let validator = Self {
            kind,
            catalog,
            preprocess: None,
            file: CheckGroup::new(StageLevel::File, file),
            data: CheckGroup::new(StageLevel::Data, data),
            logic: CheckGroup::new(StageLevel::Logic, logic),
        };
        validator.verify_producers()?;

        tracing::debug!(
            kind = %validator.kind,
            file = validator.file.len(),
            data = validator.data.len(),
            logic = validator.logic.len(),
            "bound validator"
        );
        Ok(validator)
    }

    fn verify_producers(&self) -> Result<()> {
        let mut produced: HashSet<String> = HashSet::new();
        for group in self.groups() {
            for check in group.checks() {
                if let Some(key) = check.reads().into_iter().find(|key| !produced.contains(key)) {
                    return Err(ValidateError::MissingProducer {
                        code: check.code().to_string(),
                        key,
                    });
                }
            }
            produced.extend(group.checks().iter().flat_map(Check::writes));
        }
        Ok(())
    }

    /// Install a hook that runs on every document before the file stage.
    #[must_use]
    pub fn with_preprocess<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut TabularDocument) -> std::result::Result<(), RuleError> + Send + Sync + 'static,
    {
        self.preprocess = Some(Arc::new(hook));
        self
    }

    /// Document type identifier (e.g. `BUF 1.0`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn catalog(&self) -> &CatalogData {
        &self.catalog
    }

    pub fn has_preprocess(&self) -> bool {
        self.preprocess.is_some()
    }

    /// The three stage groups in execution order.
    pub fn groups(&self) -> [&CheckGroup; 3] {
        [&self.file, &self.data, &self.logic]
    }

    pub fn group(&self, level: StageLevel) -> &CheckGroup {
        match level {
            StageLevel::File => &self.file,
            StageLevel::Data => &self.data,
            StageLevel::Logic => &self.logic,
        }
    }

    /// Every check in stage order.
    pub fn checks(&self) -> impl Iterator<Item = &Check> {
        self.groups().into_iter().flat_map(CheckGroup::checks)
    }

    /// Validate one document.
    ///
    /// Data failures are reported in the returned report. Rule faults,
    /// preprocess faults and documents that cannot be parsed or relabelled
    /// are errors.
    pub fn validate(&self, document: &mut TabularDocument) -> Result<ValidationReport> {
        document.set_expected_type(self.catalog.expected_file_type());
        let mut report = ValidationReport::new(&self.kind, document.display_name());

        if let Some(hook) = &self.preprocess {
            hook(document).map_err(|source| ValidateError::Preprocess { source })?;
        }
        document.base()?;

        for group in self.groups() {
            if group.level() == StageLevel::Data {
                document.rename_columns(&self.catalog.columns)?;
            }
            let passed = self.run_stage(group, document, &mut report)?;
            if !passed && group.level() != StageLevel::Logic {
                report.halted_at = Some(group.level());
                tracing::info!(
                    document = %report.document,
                    stage = %group.level(),
                    "stopping after failed stage"
                );
                break;
            }
        }

        Ok(report)
    }

    fn run_stage(
        &self,
        group: &CheckGroup,
        document: &mut TabularDocument,
        report: &mut ValidationReport,
    ) -> Result<bool> {
        let span = tracing::info_span!("stage", stage = %group.level());
        let _guard = span.enter();

        let rows = group.evaluate(&self.catalog, document)?;
        let passed = all_passed(&rows);
        let failed = rows.iter().filter(|row| !row.passed()).count();
        tracing::info!(checks = rows.len(), failed, passed, "stage complete");
        report.extend_stage(rows);
        Ok(passed)
    }
}
