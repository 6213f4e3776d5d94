use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use clap::ColorChoice;
use tracing::{info, info_span};

use buf_catalog::ValidatorRegistry;
use buf_cli::export::{annotated_path, write_annotated};
use buf_cli::summary::{render_checks, render_csv, render_json, render_table, render_types};
use buf_ingest::TabularDocument;
use buf_model::ValidationReport;
use buf_validate::Validator;

use crate::cli::{CatalogArgs, ReportFormatArg, ShowArgs, ValidateArgs};

/// The embedded validators plus any catalogs given on the command line.
pub fn build_registry(args: &CatalogArgs) -> Result<ValidatorRegistry> {
    let mut registry = ValidatorRegistry::with_defaults().context("load embedded catalogs")?;
    for path in &args.catalogs {
        let name = registry
            .register_file(path)
            .with_context(|| format!("load catalog {}", path.display()))?;
        info!(name = %name, path = %path.display(), "registered catalog");
    }
    Ok(registry)
}

/// Validate every file. Returns whether all reports passed.
pub fn run_validate(args: &ValidateArgs, color: ColorChoice) -> Result<bool> {
    let registry = build_registry(&args.catalog)?;
    let name = match &args.validator_type {
        Some(name) => name.as_str(),
        None => registry
            .default_name()
            .ok_or_else(|| anyhow!("no validator types are available"))?,
    };
    let validator = registry.get(name)?;
    if let Some(dir) = &args.annotated {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }

    let mut reports = Vec::with_capacity(args.files.len());
    for path in &args.files {
        reports.push(validate_file(validator, path, args.annotated.as_deref())?);
    }

    match args.format {
        ReportFormatArg::Table => {
            for report in &reports {
                println!("{}", render_table(report, color)?);
            }
        }
        ReportFormatArg::Json => println!("{}", render_json(&reports)?),
        ReportFormatArg::Csv => print!("{}", render_csv(&reports)?),
    }
    Ok(reports.iter().all(ValidationReport::passed))
}

fn validate_file(
    validator: &Validator,
    path: &Path,
    annotated: Option<&Path>,
) -> Result<ValidationReport> {
    let span = info_span!("document", path = %path.display());
    let _guard = span.enter();
    let start = Instant::now();

    let mut document = TabularDocument::from_path(path)?;
    let report = validator
        .validate(&mut document)
        .with_context(|| format!("validate {}", path.display()))?;
    info!(
        validator = validator.kind(),
        passed = report.passed(),
        checks = report.rows.len(),
        errors = report.total_errors(),
        duration_ms = start.elapsed().as_millis(),
        "validated document"
    );

    if let Some(dir) = annotated {
        let target = annotated_path(dir, path);
        write_annotated(document.working()?, &target)?;
    }
    Ok(report)
}

pub fn run_types(args: &CatalogArgs, color: ColorChoice) -> Result<()> {
    let registry = build_registry(args)?;
    println!("{}", render_types(&registry, color));
    Ok(())
}

pub fn run_show(args: &ShowArgs, color: ColorChoice) -> Result<()> {
    let registry = build_registry(&args.catalog)?;
    let validator = registry.get(&args.name)?;
    println!("{}", render_checks(&args.name, validator, color));
    Ok(())
}
