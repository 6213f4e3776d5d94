//! The rule abstraction checks are built on.

use std::fmt;

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, CheckResult};

use crate::error::RuleError;

/// What a rule sees besides the document.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Code of the check being evaluated; rules key their flag column by it.
    pub code: &'a str,
    /// Shared catalog data of the bound validator.
    pub catalog: &'a CatalogData,
}

impl<'a> RuleContext<'a> {
    pub fn new(code: &'a str, catalog: &'a CatalogData) -> Self {
        Self { code, catalog }
    }
}

/// A predicate over a document.
///
/// Rules are configured by the data they capture and may annotate the
/// working frame: a flag column keyed by the check code, plus the extra
/// derived columns listed by [`Rule::writes`]. Evaluating a rule twice on
/// the same document must give the same result.
pub trait Rule: fmt::Debug + Send + Sync {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError>;

    /// Derived columns this rule reads.
    fn reads(&self) -> Vec<String> {
        Vec::new()
    }

    /// Derived columns this rule writes besides its own flag column.
    fn writes(&self) -> Vec<String> {
        Vec::new()
    }

    /// Verify the rule's configuration against catalog data at bind time.
    fn check_config(&self, _catalog: &CatalogData) -> Result<(), RuleError> {
        Ok(())
    }
}

/// A closure wrapped as a [`Rule`].
pub struct FnRule<F> {
    reads: Vec<String>,
    writes: Vec<String>,
    func: F,
}

impl<F> FnRule<F> {
    /// Declare derived columns the closure reads.
    #[must_use]
    pub fn with_reads<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reads.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Declare derived columns the closure writes.
    #[must_use]
    pub fn with_writes<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.writes.extend(keys.into_iter().map(Into::into));
        self
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule")
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish_non_exhaustive()
    }
}

impl<F> Rule for FnRule<F>
where
    F: Fn(&RuleContext<'_>, &mut TabularDocument) -> Result<CheckResult, RuleError> + Send + Sync,
{
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        (self.func)(ctx, document)
    }

    fn reads(&self) -> Vec<String> {
        self.reads.clone()
    }

    fn writes(&self) -> Vec<String> {
        self.writes.clone()
    }
}

/// Wrap a closure as a rule.
pub fn rule_fn<F>(func: F) -> FnRule<F>
where
    F: Fn(&RuleContext<'_>, &mut TabularDocument) -> Result<CheckResult, RuleError> + Send + Sync,
{
    FnRule {
        reads: Vec::new(),
        writes: Vec::new(),
        func,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> CatalogData {
        CatalogData {
            columns: vec!["a".to_string()],
            date_format: "%m/%d/%Y".to_string(),
            date_format_desc: "MM/DD/YY".to_string(),
            valid_string: ".*".to_string(),
            valid_filename: ".*".to_string(),
            valid_filename_example: "x.csv".to_string(),
            extension: ".csv".to_string(),
            encoding: "ascii".to_string(),
            extra: Default::default(),
        }
    }

    #[test]
    fn test_rule_fn_sees_context() {
        let rule = rule_fn(|ctx, document| {
            let height = document.base()?.height();
            Ok(CheckResult::from_bool(ctx.code == "rows" && height == 2))
        })
        .with_reads(["other_dt"]);

        let catalog = catalog();
        let mut document = TabularDocument::new("x.csv", b"a\n1\n2\n".to_vec());
        let result = rule
            .evaluate(&RuleContext::new("rows", &catalog), &mut document)
            .unwrap();
        assert!(result.passed());
        assert_eq!(rule.reads(), vec!["other_dt"]);
        assert!(rule.writes().is_empty());
    }

    #[test]
    fn test_rule_fn_errors_propagate() {
        let rule = rule_fn(|_, _| Err(RuleError::custom("boom")));
        let catalog = catalog();
        let mut document = TabularDocument::new("x.csv", Vec::new());
        let err = rule
            .evaluate(&RuleContext::new("x", &catalog), &mut document)
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_rule_fn_debug_lists_declared_columns() {
        let rule = rule_fn(|_, _| Ok(CheckResult::from_bool(true)))
            .with_reads(["start_dt"])
            .with_writes(["end_dt"]);
        assert_eq!(
            format!("{rule:?}"),
            r#"FnRule { reads: ["start_dt"], writes: ["end_dt"], .. }"#
        );
    }
}
