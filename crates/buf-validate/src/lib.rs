//! Staged check engine for the BUF upload validator.
//!
//! A [`Validator`] binds [`Check`]s to shared [`buf_model::CatalogData`]
//! and runs them against a [`buf_ingest::TabularDocument`] in three stages:
//!
//! 1. **File**: extension, encoding, name, column order, cell characters
//! 2. **Data**: per-column value domains and uniqueness, after the columns
//!    were relabelled with canonical names
//! 3. **Logic**: conditional cross-field rules
//!
//! A stage only runs when every check of the previous stage passed. Each
//! check wraps a [`Rule`]; the [`rules`] module holds the rule library and
//! [`rule_fn`] wraps closures.
//!
//! # Example
//!
//! ```ignore
//! use buf_validate::{Check, Validator, rules::FileExtension};
//!
//! let validator = Validator::bind("BUF 1.0", catalog, vec![
//!     Check::new(StageLevel::File, "File extension", "file_extension",
//!         "File extension must be {extension}.", Arc::new(FileExtension)),
//! ])?;
//! let report = validator.validate(&mut document)?;
//! ```

mod check;
mod column_reader;
mod error;
mod group;
mod rule;
pub mod rules;
mod template;
mod validator;

pub use check::Check;
pub use column_reader::ColumnReader;
pub use error::{Result, RuleError, TemplateError, ValidateError};
pub use group::{CheckGroup, all_passed};
pub use rule::{FnRule, Rule, RuleContext, rule_fn};
pub use template::render as render_template;
pub use validator::{Preprocess, Validator};
