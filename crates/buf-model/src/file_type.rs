use std::fmt;

use serde::{Deserialize, Serialize};

/// Extension and detected byte encoding of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileType {
    /// Extension with its leading dot (`".csv"`), or empty when there is none.
    pub extension: String,
    /// Detected encoding label; `None` when nothing could be detected (empty input).
    pub encoding: Option<String>,
}

impl FileType {
    pub fn new(extension: impl Into<String>, encoding: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            encoding: Some(encoding.into()),
        }
    }
}

impl Default for FileType {
    fn default() -> Self {
        Self::new(".csv", "ascii")
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.extension,
            self.encoding.as_deref().unwrap_or("unknown encoding")
        )
    }
}
