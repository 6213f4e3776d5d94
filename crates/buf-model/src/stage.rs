//! Validation stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three validation stages, run in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageLevel {
    /// File shape: extension, encoding, name, columns, cell characters.
    File,
    /// Per-column value domains and uniqueness.
    Data,
    /// Cross-field conditional rules.
    Logic,
}

impl StageLevel {
    /// All stages in execution order.
    pub const ALL: [StageLevel; 3] = [StageLevel::File, StageLevel::Data, StageLevel::Logic];

    /// Parse a stage from a label (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Some(Self::File),
            "data" => Some(Self::Data),
            "logic" => Some(Self::Logic),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Data => "Data",
            Self::Logic => "Logic",
        }
    }
}

impl fmt::Display for StageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
