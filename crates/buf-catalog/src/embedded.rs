//! Catalogs embedded at compile time.

/// BUF 1.0 symbol uploads.
pub const BUF_SYMBOL: &str = include_str!("../data/buf-symbol.toml");

/// Every embedded catalog as `(origin, contents)`.
pub const EMBEDDED_CATALOGS: &[(&str, &str)] = &[("embedded:buf-symbol.toml", BUF_SYMBOL)];

/// Validator names that are reserved but have no catalog yet.
pub const RESERVED_NAMES: &[&str] = &["BUF 2.0 - Security", "BUF 3.0 - Entity"];
