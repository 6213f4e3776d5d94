//! TOML schema of a rule catalog.

use std::sync::Arc;

use buf_model::{CatalogData, StageLevel};
use buf_validate::rules::{
    Alphanumeric, ColumnOrder, Condition, Conditional, DateFormat, FileEncoding, FileExtension,
    FileName, InSet, NoBlankCells, Numeric, PermittedCharacters, Requirement, Unique,
};
use buf_validate::{Check, Rule};
use serde::{Deserialize, Serialize};

/// One catalog file: a named document type, its data and its checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFile {
    /// Registry name shown to users (e.g. `BUF 1.0 - Symbol`).
    pub name: String,
    /// Document type identifier written to reports (e.g. `BUF 1.0`).
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    pub data: CatalogData,
    #[serde(default)]
    pub checks: Vec<CheckSpec>,
}

/// One `[[checks]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSpec {
    pub stage: StageLevel,
    pub name: String,
    pub code: String,
    pub description: String,
    pub rule: RuleSpec,
    /// Derived columns read beyond those the rule declares.
    #[serde(default)]
    pub reads: Vec<String>,
}

/// Rule configuration, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSpec {
    FileExtension,
    FileEncoding,
    FileName,
    ColumnOrder,
    NoBlankCells,
    PermittedCharacters,
    Numeric {
        column: String,
        #[serde(default)]
        allow_missing: bool,
    },
    Alphanumeric {
        column: String,
    },
    DateFormat {
        column: String,
    },
    InSet {
        column: String,
        values: Vec<String>,
    },
    Unique {
        columns: Vec<String>,
    },
    Conditional {
        #[serde(default)]
        when: Vec<ConditionSpec>,
        then: RequirementSpec,
    },
}

/// `{ column = "...", in = [...] }`: the cell is one of the values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSpec {
    pub column: String,
    #[serde(rename = "in")]
    pub values: Vec<String>,
}

/// Consequent of a conditional rule, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequirementSpec {
    Numeric { column: String },
    Missing { column: String },
    Populated { column: String },
    In { column: String, values: Vec<String> },
    DateNotBefore { column: String, other: String },
}

impl RuleSpec {
    /// Reject configurations no rule can work with.
    pub fn problem(&self) -> Option<String> {
        match self {
            Self::InSet { values, .. } if values.is_empty() => {
                Some("in_set needs at least one value".to_string())
            }
            Self::Unique { columns } if columns.is_empty() => {
                Some("unique needs at least one column".to_string())
            }
            Self::Conditional { when, .. } if when.iter().any(|c| c.values.is_empty()) => {
                Some("conditions need at least one value".to_string())
            }
            _ => None,
        }
    }

    /// Build the configured rule.
    pub fn build(&self) -> Arc<dyn Rule> {
        match self {
            Self::FileExtension => Arc::new(FileExtension),
            Self::FileEncoding => Arc::new(FileEncoding),
            Self::FileName => Arc::new(FileName),
            Self::ColumnOrder => Arc::new(ColumnOrder),
            Self::NoBlankCells => Arc::new(NoBlankCells),
            Self::PermittedCharacters => Arc::new(PermittedCharacters),
            Self::Numeric {
                column,
                allow_missing,
            } => Arc::new(Numeric {
                column: column.clone(),
                allow_missing: *allow_missing,
            }),
            Self::Alphanumeric { column } => Arc::new(Alphanumeric::new(column.as_str())),
            Self::DateFormat { column } => Arc::new(DateFormat::new(column.as_str())),
            Self::InSet { column, values } => {
                Arc::new(InSet::new(column.as_str(), values.iter().cloned()))
            }
            Self::Unique { columns } => Arc::new(Unique::new(columns.iter().cloned())),
            Self::Conditional { when, then } => Arc::new(Conditional::new(
                when.iter()
                    .map(|c| Condition::one_of(c.column.as_str(), c.values.iter().cloned()))
                    .collect(),
                then.to_requirement(),
            )),
        }
    }
}

impl RequirementSpec {
    pub fn to_requirement(&self) -> Requirement {
        match self {
            Self::Numeric { column } => Requirement::Numeric {
                column: column.clone(),
            },
            Self::Missing { column } => Requirement::Missing {
                column: column.clone(),
            },
            Self::Populated { column } => Requirement::Populated {
                column: column.clone(),
            },
            Self::In { column, values } => Requirement::In {
                column: column.clone(),
                values: values.iter().cloned().collect(),
            },
            Self::DateNotBefore { column, other } => Requirement::DateNotBefore {
                column: column.clone(),
                other: other.clone(),
            },
        }
    }
}

impl CheckSpec {
    /// Build the (unbound) check.
    pub fn to_check(&self) -> Check {
        Check::new(
            self.stage,
            self.name.as_str(),
            self.code.as_str(),
            self.description.as_str(),
            self.rule.build(),
        )
        .with_reads(self.reads.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_spec_tagged_by_kind() {
        let spec: RuleSpec = toml::from_str(
            r#"kind = "numeric"
column = "symbolId"
allow_missing = true"#,
        )
        .unwrap();
        assert_eq!(
            spec,
            RuleSpec::Numeric {
                column: "symbolId".to_string(),
                allow_missing: true
            }
        );

        let spec: RuleSpec = toml::from_str(r#"kind = "file_name""#).unwrap();
        assert_eq!(spec, RuleSpec::FileName);
    }

    #[test]
    fn test_conditional_spec() {
        let spec: RuleSpec = toml::from_str(
            r#"kind = "conditional"
when = [{ column = "processType", in = ["I"] }]
then = { kind = "date_not_before", column = "end", other = "start" }"#,
        )
        .unwrap();
        let rule = spec.build();
        assert_eq!(rule.reads(), vec!["end_dt", "start_dt"]);
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(toml::from_str::<RuleSpec>(r#"kind = "regex_magic""#).is_err());
    }

    #[test]
    fn test_problems() {
        let spec = RuleSpec::Unique { columns: vec![] };
        assert!(spec.problem().is_some());
        let spec = RuleSpec::InSet {
            column: "a".to_string(),
            values: vec!["x".to_string()],
        };
        assert!(spec.problem().is_none());
    }
}
