//! Error types for catalog loading and validator lookup.

use std::path::PathBuf;

use buf_validate::ValidateError;
use thiserror::Error;

/// Errors raised while loading catalogs or looking up validators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    // === Loading Errors ===
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML catalog {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// A check's rule configuration is unusable.
    #[error("check '{code}' in catalog '{catalog}': {message}")]
    InvalidRule {
        catalog: String,
        code: String,
        message: String,
    },

    /// The checks could not be bound to the catalog data.
    #[error("failed to bind catalog '{catalog}': {source}")]
    Bind {
        catalog: String,
        #[source]
        source: ValidateError,
    },

    // === Lookup Errors ===
    #[error("unknown validator '{name}' (available: {available})")]
    UnknownValidator { name: String, available: String },

    /// The name is reserved but has no catalog yet.
    #[error("validator '{name}' is not available yet")]
    Unavailable { name: String },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
