//! Declarative rule catalogs for the BUF upload validator.
//!
//! A catalog is a TOML file naming a document type, the data its checks
//! share (canonical columns, date format, patterns, expected file type) and
//! the ordered list of checks. [`ValidatorRegistry`] binds catalogs into
//! [`buf_validate::Validator`]s and looks them up by name.

pub mod embedded;
mod error;
mod loader;
mod registry;
pub mod schema;

pub use error::{CatalogError, Result};
pub use loader::{load_catalog, parse_catalog};
pub use registry::ValidatorRegistry;
pub use schema::{CatalogFile, CheckSpec, ConditionSpec, RequirementSpec, RuleSpec};
