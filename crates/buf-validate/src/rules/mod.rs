//! The rule library.
//!
//! - [`file`]: extension, encoding, file name and column order
//! - [`cell`]: per-cell content rules
//! - [`uniqueness`]: duplicate detection across key columns
//! - [`logic`]: conditional cross-field rules

pub mod cell;
pub mod file;
pub mod logic;
pub mod uniqueness;

pub use cell::{Alphanumeric, DateFormat, InSet, NoBlankCells, Numeric, PermittedCharacters};
pub use file::{ColumnOrder, FileEncoding, FileExtension, FileName};
pub use logic::{Condition, Conditional, Requirement};
pub use uniqueness::Unique;

use buf_ingest::TabularDocument;
use buf_model::CheckResult;
use regex::Regex;

use crate::column_reader::ColumnReader;
use crate::error::RuleError;
use crate::rule::RuleContext;

/// Compile `pattern` so that it must match a whole value.
pub fn full_match(pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| RuleError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Non-empty and made only of numeric characters.
pub fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_numeric)
}

/// Non-empty and made only of letters and numeric characters.
pub fn is_alphanumeric(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphanumeric)
}

/// Flag each cell of a working column with `predicate`, store the flags
/// under the check code and report the offending cells.
pub(crate) fn flag_column<F>(
    ctx: &RuleContext<'_>,
    document: &mut TabularDocument,
    column: &str,
    predicate: F,
) -> Result<CheckResult, RuleError>
where
    F: Fn(Option<&str>) -> bool,
{
    let (flags, offenders) = {
        let working = document.working()?;
        let reader = ColumnReader::new(working.data());
        let flags = reader.flags(column, predicate)?;
        let offenders = reader.offenders(column, &flags)?;
        (flags, offenders)
    };
    document.working_mut()?.set_flags(ctx.code, flags)?;
    Ok(CheckResult::from_offenders(offenders))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_anchors_alternation() {
        let re = full_match(r"[\-/\w@*#.:]+|").unwrap();
        assert!(re.is_match("abc-1/2"));
        assert!(re.is_match(""));
        assert!(!re.is_match("a b"));
        assert!(!re.is_match("ok!"));
    }

    #[test]
    fn test_full_match_bad_pattern() {
        assert!(matches!(full_match("("), Err(RuleError::Pattern { .. })));
    }

    #[test]
    fn test_numeric_predicates() {
        assert!(is_numeric("0123"));
        assert!(is_numeric("٣"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("1.5"));
        assert!(!is_numeric("-1"));
        assert!(is_alphanumeric("abc123"));
        assert!(!is_alphanumeric("abc 123"));
        assert!(!is_alphanumeric(""));
    }
}
