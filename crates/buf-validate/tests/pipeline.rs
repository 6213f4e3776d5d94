//! End-to-end runs of the staged pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use buf_ingest::TabularDocument;
use buf_model::{CatalogData, StageLevel};
use buf_validate::rules::{
    ColumnOrder, Condition, Conditional, DateFormat, FileExtension, InSet, NoBlankCells, Numeric,
    Requirement, Unique,
};
use buf_validate::{Check, RuleError, ValidateError, Validator, rule_fn};

fn catalog() -> CatalogData {
    CatalogData {
        columns: ["symbolId", "processType", "symbolStartDate", "symbolEndDate"]
            .map(String::from)
            .to_vec(),
        date_format: "%m/%d/%Y".to_string(),
        date_format_desc: "MM/DD/YY".to_string(),
        valid_string: r"[\-/\w@*#.:]+|".to_string(),
        valid_filename: r"^([-_A-Za-z0-9]+)_(\([A-Za-z0-9._]+\)).csv$".to_string(),
        valid_filename_example: "filedescription_000_(username).csv".to_string(),
        extension: ".csv".to_string(),
        encoding: "ascii".to_string(),
        extra: Default::default(),
    }
}

fn checks() -> Vec<Check> {
    vec![
        Check::new(
            StageLevel::File,
            "File extension",
            "file_extension",
            "File extension must be {extension}.",
            Arc::new(FileExtension),
        ),
        Check::new(
            StageLevel::File,
            "Columns",
            "all_columns",
            "All columns specified must be present in the file in correct order.",
            Arc::new(ColumnOrder),
        ),
        Check::new(
            StageLevel::File,
            "Blank values",
            "blank_values",
            "File must not have any blank values",
            Arc::new(NoBlankCells),
        ),
        Check::new(
            StageLevel::Data,
            "SymbolID is numeric",
            "symbolid_numeric",
            "SymbolID must be numeric or NULL.",
            Arc::new(Numeric::or_missing("symbolId")),
        ),
        Check::new(
            StageLevel::Data,
            "ProcessType Validation",
            "processtype_validation",
            "Process Type can either be I, U, D.",
            Arc::new(InSet::new("processType", ["I", "U", "D"])),
        ),
        Check::new(
            StageLevel::Data,
            "SymbolStartDate is proper date",
            "symbolstartdate_format",
            "SymbolStartDate can either be NULL or it should have a Date format like {date_format_desc}",
            Arc::new(DateFormat::new("symbolStartDate")),
        ),
        Check::new(
            StageLevel::Data,
            "SymbolEndDate is proper date",
            "symbolenddate_format",
            "SymbolEndDate can either be NULL or it should have a Date format like {date_format_desc}",
            Arc::new(DateFormat::new("symbolEndDate")),
        ),
        Check::new(
            StageLevel::Data,
            "Unique Values",
            "symbol_dupes",
            "No duplicate rows.",
            Arc::new(Unique::new(["symbolId", "processType"])),
        ),
        Check::new(
            StageLevel::Logic,
            "SymbolID populated when U or D ProcessType",
            "processtype_ud_symbolid",
            "If ProcessType is U or D, symbolId should always be populated",
            Arc::new(Conditional::new(
                vec![Condition::one_of("processType", ["U", "D"])],
                Requirement::Numeric {
                    column: "symbolId".to_string(),
                },
            )),
        ),
        Check::new(
            StageLevel::Logic,
            "SymbolEndDate is greater than SymbolStartDate",
            "processtype_iu_endgtstart",
            "If ProcessType is I or U, SymbolStartDate should always be less than SymbolEndDate",
            Arc::new(Conditional::new(
                vec![Condition::one_of("processType", ["I", "U"])],
                Requirement::DateNotBefore {
                    column: "symbolEndDate".to_string(),
                    other: "symbolStartDate".to_string(),
                },
            )),
        ),
    ]
}

fn validator() -> Validator {
    Validator::bind("BUF 1.0", catalog(), checks()).expect("bind")
}

fn document(name: &str, text: &str) -> TabularDocument {
    TabularDocument::new(name, text.as_bytes().to_vec())
}

const HEADER: &str = "symbolId,processType,symbolStartDate,symbolEndDate\n";

#[test]
fn clean_upload_passes_every_stage() {
    let text = format!("{HEADER}NULL,I,01/01/2024,NULL\n12,U,01/01/2024,02/01/2024\n");
    let report = validator()
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect("validate");
    assert!(report.passed());
    assert_eq!(report.rows.len(), 10);
    assert_eq!(
        report.stages_run(),
        vec![StageLevel::File, StageLevel::Data, StageLevel::Logic]
    );
    assert!(report.rows.iter().enumerate().all(|(idx, row)| row.index == idx));
    assert_eq!(
        report.rows[0].description,
        "File extension must be .csv."
    );
}

#[test]
fn file_stage_failure_stops_before_data() {
    let text = format!("{HEADER}1,I,01/01/2024,\n");
    let mut doc = document("symbols_001_(jdoe).csv", &text);
    let report = validator().validate(&mut doc).expect("validate");

    assert_eq!(report.halted_at, Some(StageLevel::File));
    assert_eq!(report.rows.len(), 3);
    assert!(report.rows.iter().all(|row| row.level == StageLevel::File));
    assert!(!report.passed());
    assert!(!doc.is_renamed());
}

#[test]
fn data_stage_failure_stops_before_logic() {
    let text = format!("{HEADER}abc,X,01/01/2024,NULL\n");
    let report = validator()
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect("validate");

    assert_eq!(report.halted_at, Some(StageLevel::Data));
    assert_eq!(report.stages_run(), vec![StageLevel::File, StageLevel::Data]);
    assert_eq!(report.rows_for(StageLevel::Logic).count(), 0);
    let failed: Vec<&str> = report.failed_rows().map(|row| row.code.as_str()).collect();
    assert_eq!(failed, vec!["symbolid_numeric", "processtype_validation"]);
}

#[test]
fn canonical_names_apply_regardless_of_header_case() {
    let text = "SYMBOLID,PROCESSTYPE,SymbolStartDate,SYMBOLENDDATE\n5,D,01/01/2024,NULL\n";
    let mut doc = document("symbols_001_(jdoe).csv", text);
    let report = validator().validate(&mut doc).expect("validate");

    assert!(report.passed());
    assert!(doc.is_renamed());
    assert_eq!(
        doc.base().expect("base").column_names(),
        catalog().columns
    );
}

#[test]
fn logic_stage_reports_only_failing_rows() {
    let text = format!(
        "{HEADER}123,U,01/01/2024,NULL\nNULL,D,01/01/2024,NULL\n7,I,03/01/2024,02/01/2024\n"
    );
    let report = validator()
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect("validate");

    assert_eq!(report.halted_at, None);
    let logic: Vec<_> = report.rows_for(StageLevel::Logic).collect();
    assert_eq!(logic.len(), 2);
    assert_eq!(logic[0].result.row_indices(), Some(&[1][..]));
    assert_eq!(logic[1].result.row_indices(), Some(&[2][..]));
    assert!(!report.passed());
}

#[test]
fn two_digit_year_fails_date_format() {
    let text = format!("{HEADER}1,I,01/31/24,NULL\n2,U,01/31/2024,02/01/024\n");
    let report = validator()
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect("validate");

    assert_eq!(report.halted_at, Some(StageLevel::Data));
    let start = report
        .rows
        .iter()
        .find(|row| row.code == "symbolstartdate_format")
        .expect("start date row");
    assert!(!start.passed());
    assert_eq!(start.result.row_indices(), Some(&[0][..]));
    let end = report
        .rows
        .iter()
        .find(|row| row.code == "symbolenddate_format")
        .expect("end date row");
    assert_eq!(end.result.row_indices(), Some(&[1][..]));
}

#[test]
fn duplicate_rows_are_flagged_symmetrically() {
    let text = format!("{HEADER}1,U,NULL,NULL\n1,U,NULL,NULL\n2,U,NULL,NULL\n");
    let report = validator()
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect("validate");
    let dupes = report
        .rows
        .iter()
        .find(|row| row.code == "symbol_dupes")
        .expect("dupes row");
    assert_eq!(dupes.result.row_indices(), Some(&[0, 1][..]));
}

#[test]
fn preprocess_hook_runs_first() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let validator = validator().with_preprocess(move |doc| {
        seen.fetch_add(1, Ordering::SeqCst);
        assert!(!doc.is_renamed());
        Ok(())
    });
    let text = format!("{HEADER}1,U,NULL,NULL\n");
    validator
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect("validate");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn preprocess_error_is_fatal() {
    let validator = validator().with_preprocess(|_| Err(RuleError::custom("no access")));
    let err = validator
        .validate(&mut document("symbols_001_(jdoe).csv", HEADER))
        .expect_err("hook fails");
    assert!(matches!(err, ValidateError::Preprocess { .. }));
}

#[test]
fn rule_fault_propagates_out_of_validator() {
    let mut checks = checks();
    checks.push(Check::new(
        StageLevel::File,
        "Broken",
        "broken",
        "",
        Arc::new(rule_fn(|_, _| Err(RuleError::custom("misconfigured")))),
    ));
    let validator = Validator::bind("BUF 1.0", catalog(), checks).expect("bind");
    let err = validator
        .validate(&mut document("symbols_001_(jdoe).csv", HEADER))
        .expect_err("fault");
    assert!(matches!(err, ValidateError::Rule { ref code, .. } if code == "broken"));
}

#[test]
fn unparsable_upload_of_expected_type_is_error() {
    let text = format!("{HEADER}1,U,NULL,NULL,extra\n");
    let err = validator()
        .validate(&mut document("symbols_001_(jdoe).csv", &text))
        .expect_err("parse error");
    assert!(matches!(err, ValidateError::Document(_)));
}

#[test]
fn unparsable_upload_of_other_type_fails_file_stage() {
    let text = format!("{HEADER}1,U,NULL,NULL,extra\n");
    let report = validator()
        .validate(&mut document("symbols.xlsx", &text))
        .expect("tolerated");
    assert_eq!(report.halted_at, Some(StageLevel::File));
    assert!(!report.rows[0].passed());
    assert!(!report.rows[1].passed());
}

#[test]
fn one_validator_serves_parallel_documents() {
    let validator = validator();
    let text = format!("{HEADER}1,U,NULL,NULL\n");
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|idx| {
                let validator = &validator;
                let text = text.clone();
                scope.spawn(move || {
                    let name = format!("symbols_{idx:03}_(jdoe).csv");
                    validator
                        .validate(&mut document(&name, &text))
                        .expect("validate")
                        .passed()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().expect("thread"));
        }
    });
}
