//! Library components of the `buf-validator` command-line tool.

pub mod export;
pub mod logging;
pub mod summary;
