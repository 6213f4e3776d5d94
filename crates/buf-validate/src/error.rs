//! Error types for the check engine.

use buf_ingest::DocumentError;
use thiserror::Error;

/// A fault raised by a rule while evaluating a document.
///
/// Rule errors are configuration or programming mistakes, never data
/// failures: a data failure is a failed [`buf_model::CheckResult`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The document could not be read, parsed or annotated.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A configured pattern does not compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A derived column the rule depends on has not been written.
    #[error("derived column '{key}' has not been written")]
    MissingDerived { key: String },

    /// Rule-specific failure.
    #[error("{0}")]
    Custom(String),
}

impl RuleError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// A description template could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// `{key}` names a value the catalog does not provide.
    #[error("unknown placeholder '{key}'")]
    UnknownKey { key: String },

    /// A `{` without its `}` or a lone `}`.
    #[error("unmatched brace at byte {position}")]
    UnmatchedBrace { position: usize },
}

/// Errors raised while binding or running a validator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidateError {
    // === Bind Errors ===
    /// Two checks share a code.
    #[error("duplicate check code '{code}'")]
    DuplicateCode { code: String },

    /// A description template could not be rendered.
    #[error("check '{code}' has an invalid description: {source}")]
    Template {
        code: String,
        #[source]
        source: TemplateError,
    },

    /// A check reads a derived column no earlier stage writes.
    #[error("check '{code}' reads '{key}', which no check of an earlier stage writes")]
    MissingProducer { code: String, key: String },

    /// A rule rejected its configuration.
    #[error("check '{code}' is misconfigured: {source}")]
    Config {
        code: String,
        #[source]
        source: RuleError,
    },

    // === Run Errors ===
    /// A rule faulted while evaluating.
    #[error("check '{code}' failed to run: {source}")]
    Rule {
        code: String,
        #[source]
        source: RuleError,
    },

    /// The preprocess hook faulted.
    #[error("preprocess hook failed: {source}")]
    Preprocess {
        #[source]
        source: RuleError,
    },

    /// The document could not be parsed or renamed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Result type for validator operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
