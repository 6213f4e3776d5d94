//! File-shape rules: extension, encoding, name and column order.

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, CheckResult, ColumnMismatch, Offender};

use super::full_match;
use crate::error::RuleError;
use crate::rule::{Rule, RuleContext};

/// Advice attached to failed encoding checks.
pub const ENCODING_ADVICE: &str = "Make sure to save the file as CSV (Comma delimited) (*.csv) and not CSV UTF-8 (Comma delimited) (*.csv)";

/// The file extension equals the catalog's `extension`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtension;

impl Rule for FileExtension {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let extension = document.file_type().extension;
        let ok = extension == ctx.catalog.extension;
        Ok(CheckResult::from_bool(ok).with_values(vec![Offender::Value(extension)]))
    }
}

/// The detected encoding equals the catalog's `encoding`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileEncoding;

impl Rule for FileEncoding {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let encoding = document.file_type().encoding;
        if encoding.as_deref() == Some(ctx.catalog.encoding.as_str()) {
            return Ok(CheckResult::pass());
        }
        Ok(CheckResult::from_bool(false)
            .with_values(vec![Offender::from_cell(encoding.as_deref())])
            .with_comment(ENCODING_ADVICE))
    }
}

/// The file name fully matches the catalog's `valid_filename` pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileName;

impl Rule for FileName {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let pattern = full_match(&ctx.catalog.valid_filename)?;
        let name = document.file_name();
        let ok = pattern.is_match(&name);
        Ok(CheckResult::from_bool(ok).with_values(vec![Offender::Value(name)]))
    }

    fn check_config(&self, catalog: &CatalogData) -> Result<(), RuleError> {
        full_match(&catalog.valid_filename).map(|_| ())
    }
}

/// The file's headers match the catalog's `columns` position by position,
/// ignoring case. Extra or missing positions are mismatches too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnOrder;

impl Rule for ColumnOrder {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        document: &mut TabularDocument,
    ) -> Result<CheckResult, RuleError> {
        let received = document.base()?.column_names();
        let expected = &ctx.catalog.columns;
        let width = expected.len().max(received.len());

        let mismatches: Vec<ColumnMismatch> = (0..width)
            .filter_map(|idx| {
                let want = expected.get(idx).map(String::as_str);
                let got = received.get(idx).map(String::as_str);
                let same = matches!(
                    (want, got),
                    (Some(w), Some(g)) if w.to_lowercase() == g.to_lowercase()
                );
                (!same).then(|| ColumnMismatch::new(idx + 1, want, got))
            })
            .collect();

        Ok(CheckResult::from_mismatches(mismatches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::catalog;

    fn run(rule: &dyn Rule, document: &mut TabularDocument) -> CheckResult {
        let catalog = catalog();
        rule.evaluate(&RuleContext::new("test", &catalog), document)
            .unwrap()
    }

    #[test]
    fn test_extension_mismatch() {
        let mut document = TabularDocument::new("foo.txt", b"a\n1\n".to_vec());
        let result = run(&FileExtension, &mut document);
        assert!(!result.passed());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.values(), Some(&[Offender::from(".txt")][..]));
    }

    #[test]
    fn test_extension_match() {
        let mut document = TabularDocument::new("foo.csv", b"a\n1\n".to_vec());
        let result = run(&FileExtension, &mut document);
        assert!(result.passed());
        assert!(result.values().is_none());
    }

    #[test]
    fn test_encoding_failure_has_advice() {
        let mut document = TabularDocument::new("foo.csv", "a\né\n".as_bytes().to_vec());
        let result = run(&FileEncoding, &mut document);
        assert!(!result.passed());
        assert_eq!(result.values(), Some(&[Offender::from("utf-8")][..]));
        assert_eq!(result.comment(), Some(ENCODING_ADVICE));

        let mut document = TabularDocument::new("foo.csv", b"a\n1\n".to_vec());
        let result = run(&FileEncoding, &mut document);
        assert!(result.passed());
        assert!(result.comment().is_none());
    }

    #[test]
    fn test_empty_upload_has_no_encoding() {
        let mut document = TabularDocument::new("foo.csv", Vec::new());
        let result = run(&FileEncoding, &mut document);
        assert_eq!(result.values(), Some(&[Offender::Missing][..]));
    }

    #[test]
    fn test_file_name_pattern() {
        let mut good = TabularDocument::new("dir/symbols_001_(jdoe).csv", Vec::new());
        assert!(run(&FileName, &mut good).passed());

        let mut bad = TabularDocument::new("dir/symbols 001.csv", Vec::new());
        let result = run(&FileName, &mut bad);
        assert!(!result.passed());
        assert_eq!(result.values(), Some(&[Offender::from("symbols 001.csv")][..]));
    }

    #[test]
    fn test_column_order_case_insensitive() {
        let mut document = TabularDocument::new(
            "x.csv",
            b"SYMBOLID,processtype,symbolStartDate,symbolEndDate\n".to_vec(),
        );
        assert!(run(&ColumnOrder, &mut document).passed());
    }

    #[test]
    fn test_column_order_reports_positions() {
        let mut catalog = catalog();
        catalog.columns = ["a", "b", "c"].map(String::from).to_vec();
        let mut document = TabularDocument::new("x.csv", b"a,B,d\n".to_vec());
        let result = ColumnOrder
            .evaluate(&RuleContext::new("all_columns", &catalog), &mut document)
            .unwrap();
        assert_eq!(result.error_count(), 1);
        assert_eq!(
            result.values(),
            Some(&[Offender::Column(ColumnMismatch::new(3, Some("c"), Some("d")))][..])
        );
    }

    #[test]
    fn test_column_order_extra_and_missing() {
        let mut catalog = catalog();
        catalog.columns = ["a", "b"].map(String::from).to_vec();
        let ctx = RuleContext::new("all_columns", &catalog);

        let mut extra = TabularDocument::new("x.csv", b"a,b,z\n".to_vec());
        let result = ColumnOrder.evaluate(&ctx, &mut extra).unwrap();
        assert_eq!(
            result.values(),
            Some(&[Offender::Column(ColumnMismatch::new(3, None, Some("z")))][..])
        );

        let mut missing = TabularDocument::new("x.csv", b"a\n".to_vec());
        let result = ColumnOrder.evaluate(&ctx, &mut missing).unwrap();
        assert_eq!(
            result.values(),
            Some(&[Offender::Column(ColumnMismatch::new(2, Some("b"), None))][..])
        );
    }
}
