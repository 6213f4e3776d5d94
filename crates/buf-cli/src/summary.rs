//! Report rendering: terminal tables, JSON and CSV.

use std::fmt;

use anyhow::{Context, Result};
use clap::ColorChoice;
use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use serde::Serialize;

use buf_catalog::ValidatorRegistry;
use buf_model::{ReportRow, StageLevel, ValidationReport};
use buf_validate::Validator;

/// Offending values and row indices shown per check before eliding.
const PREVIEW_LIMIT: usize = 8;

#[derive(Serialize)]
struct JsonOutput<'a> {
    passed: bool,
    reports: &'a [ValidationReport],
}

/// One report as a terminal table followed by its verdict.
pub fn render_table(report: &ValidationReport, color: ColorChoice) -> Result<String> {
    let mut out = String::new();
    write_report(&mut out, report, color).context("render report table")?;
    Ok(out)
}

/// Write `report` as a terminal table, its failures and its verdict.
pub fn write_report(
    out: &mut impl fmt::Write,
    report: &ValidationReport,
    color: ColorChoice,
) -> fmt::Result {
    writeln!(out, "Validator: {}", report.validator)?;
    writeln!(out, "Document: {}", report.document)?;

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Stage"),
        header_cell("Check"),
        header_cell("Code"),
        header_cell("Status"),
        header_cell("Errors"),
        header_cell("Rows"),
        header_cell("Values"),
    ]);
    apply_report_table_style(&mut table);
    apply_color(&mut table, color);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Right);
    for row in &report.rows {
        table.add_row(vec![
            Cell::new(row.index),
            stage_cell(row.level),
            Cell::new(&row.name),
            Cell::new(&row.code),
            status_cell(row.passed()),
            count_cell(row.result.error_count()),
            list_cell(row.result.row_indices().unwrap_or_default()),
            list_cell(row.result.values().unwrap_or_default()),
        ]);
    }
    writeln!(out, "{table}")?;

    for row in report.failed_rows() {
        writeln!(out, "- [{}] {}", row.code, row.description)?;
        if let Some(comment) = row.result.comment() {
            writeln!(out, "  {comment}")?;
        }
    }
    writeln!(out, "{}", verdict(report))
}

/// One-line outcome of a report.
pub fn verdict(report: &ValidationReport) -> String {
    if report.passed() {
        return format!("PASSED: {} checks", report.rows.len());
    }
    let failed = report.failed_rows().count();
    let halted = report
        .halted_at
        .map(|stage| format!(" (stopped after the {stage} stage)"))
        .unwrap_or_default();
    format!(
        "FAILED: {failed} of {} checks, {} errors{halted}",
        report.rows.len(),
        report.total_errors()
    )
}

/// All reports as one pretty-printed JSON document.
pub fn render_json(reports: &[ValidationReport]) -> Result<String> {
    let output = JsonOutput {
        passed: reports.iter().all(ValidationReport::passed),
        reports,
    };
    serde_json::to_string_pretty(&output).context("serialize reports")
}

/// All report rows as CSV, one line per check.
pub fn render_csv(reports: &[ValidationReport]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "document",
        "validator",
        "index",
        "stage",
        "code",
        "name",
        "passed",
        "error_count",
        "row_indices",
        "values",
        "comment",
        "description",
    ])?;
    for report in reports {
        for row in &report.rows {
            writer.write_record(csv_record(report, row))?;
        }
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| anyhow::anyhow!("flush CSV report: {}", error.error()))?;
    String::from_utf8(bytes).context("CSV report is not UTF-8")
}

fn csv_record(report: &ValidationReport, row: &ReportRow) -> Vec<String> {
    let join = |items: Vec<String>| items.join(";");
    vec![
        report.document.clone(),
        report.validator.clone(),
        row.index.to_string(),
        row.level.to_string(),
        row.code.clone(),
        row.name.clone(),
        row.passed().to_string(),
        row.result.error_count().to_string(),
        join(
            row.result
                .row_indices()
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        join(
            row.result
                .values()
                .unwrap_or_default()
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        row.result.comment().unwrap_or_default().to_string(),
        row.description.clone(),
    ]
}

/// Registered validator names with their status.
pub fn render_types(registry: &ValidatorRegistry, color: ColorChoice) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Checks"),
        header_cell("Status"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    apply_color(&mut table, color);
    align_column(&mut table, 2, CellAlignment::Right);
    for (name, description, validator) in registry.entries() {
        let (kind, checks, status) = match validator {
            Some(validator) => (
                Cell::new(validator.kind()),
                Cell::new(validator.checks().count()),
                Cell::new("available").fg(Color::Green),
            ),
            None => (dim_cell("-"), dim_cell("-"), dim_cell("reserved")),
        };
        table.add_row(vec![
            Cell::new(name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            kind,
            checks,
            status,
            Cell::new(description.unwrap_or("-")),
        ]);
    }
    format!("{table}")
}

/// The bound checks of one validator in execution order.
pub fn render_checks(name: &str, validator: &Validator, color: ColorChoice) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Code"),
        header_cell("Check"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    apply_color(&mut table, color);
    for check in validator.checks() {
        table.add_row(vec![
            stage_cell(check.level()),
            Cell::new(check.code()),
            Cell::new(check.name()),
            Cell::new(check.description()),
        ]);
    }
    format!("{name} ({})\n{table}", validator.kind())
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_report_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 8 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(3)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(12)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
        ]);
    }
}

fn apply_color(table: &mut Table, color: ColorChoice) {
    match color {
        ColorChoice::Always => {
            table.enforce_styling();
        }
        ColorChoice::Never => {
            table.force_no_tty();
        }
        ColorChoice::Auto => {}
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(level: StageLevel) -> Cell {
    let color = match level {
        StageLevel::File => Color::Blue,
        StageLevel::Data => Color::Magenta,
        StageLevel::Logic => Color::DarkCyan,
    };
    Cell::new(level.label()).fg(color)
}

fn status_cell(passed: bool) -> Cell {
    if passed {
        Cell::new("PASS").fg(Color::Green)
    } else {
        Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: u64) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn list_cell<T: ToString>(items: &[T]) -> Cell {
    if items.is_empty() {
        return dim_cell("-");
    }
    Cell::new(preview(items))
}

/// Comma-separated items, elided after [`PREVIEW_LIMIT`].
pub fn preview<T: ToString>(items: &[T]) -> String {
    let text = items
        .iter()
        .take(PREVIEW_LIMIT)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > PREVIEW_LIMIT {
        format!("{text} (+{} more)", items.len() - PREVIEW_LIMIT)
    } else {
        text
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
