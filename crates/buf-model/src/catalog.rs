//! Per-document-type configuration shared by every check of a validator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::FileType;

/// Rule catalog data for one document type.
///
/// Built once when a validator is bound and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogData {
    /// Canonical column names, in the order the upload must present them.
    pub columns: Vec<String>,
    /// strftime-style date format (e.g. `%m/%d/%Y`).
    pub date_format: String,
    /// Human description of the date format for messages.
    pub date_format_desc: String,
    /// Pattern every non-missing cell must fully match.
    pub valid_string: String,
    /// Pattern the file name must fully match.
    pub valid_filename: String,
    /// Example file name for messages.
    pub valid_filename_example: String,
    /// Expected extension, with leading dot.
    pub extension: String,
    /// Expected detected encoding.
    pub encoding: String,
    /// Free-form values available to description templates.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl CatalogData {
    /// The file type an upload is expected to have.
    pub fn expected_file_type(&self) -> FileType {
        FileType::new(self.extension.clone(), self.encoding.clone())
    }

    /// Look up a value usable as a `{placeholder}` in description templates.
    pub fn placeholder(&self, key: &str) -> Option<String> {
        let value = match key {
            "columns" => self.columns.join(", "),
            "date_format" => self.date_format.clone(),
            "date_format_desc" => self.date_format_desc.clone(),
            "valid_string" => self.valid_string.clone(),
            "valid_filename" => self.valid_filename.clone(),
            "valid_filename_example" => self.valid_filename_example.clone(),
            "extension" => self.extension.clone(),
            "encoding" => self.encoding.clone(),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }
}
