//! Annotated export of a document's working frame.
//!
//! The export holds the upload's columns followed by every derived column
//! the checks attached: per-row pass flags under the check code and parsed
//! dates under `<column>_dt`. Missing cells are written as `NULL` and blank
//! cells as `""`.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, SerWriter};

use buf_ingest::WorkingFrame;

const MISSING: &str = "NULL";

/// Export path for `document` inside `dir`: `<stem>.annotated.csv`.
pub fn annotated_path(dir: &Path, document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    dir.join(format!("{stem}.annotated.csv"))
}

/// Write the annotated working frame as CSV.
pub fn write_annotated(working: &WorkingFrame, path: &Path) -> Result<()> {
    let mut df = working.to_dataframe()?;
    let mut file =
        File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_null_value(MISSING.to_string())
        .finish(&mut df)
        .with_context(|| format!("write {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote annotated export"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buf_ingest::Frame;

    fn working() -> WorkingFrame {
        let frame = Frame::from_columns(vec![
            ("when", vec![Some("01/15/2024"), None]),
            ("flag", vec![Some(""), Some("1")]),
        ])
        .unwrap();
        let mut working = WorkingFrame::new(frame);
        working.set_flags("flag_check", vec![true, false]).unwrap();
        working.materialize_dates("when", "%m/%d/%Y").unwrap();
        working
    }

    #[test]
    fn test_export_appends_derived_columns() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.annotated.csv");
        write_annotated(&working(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "when,flag,flag_check,when_dt",
                "01/15/2024,\"\",true,2024-01-15T00:00:00",
                "NULL,1,false,NULL",
            ]
        );
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("absent").join("out.csv");
        let err = write_annotated(&working(), &path).unwrap_err();
        assert!(err.to_string().starts_with("create "));
    }

    #[test]
    fn test_annotated_path() {
        let path = annotated_path(Path::new("out"), Path::new("in/symbols_001_(me).csv"));
        assert_eq!(path, Path::new("out").join("symbols_001_(me).annotated.csv"));
    }
}
