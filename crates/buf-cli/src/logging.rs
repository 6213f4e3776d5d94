//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! The library crates only emit events; this module installs the global
//! subscriber for the `buf-validator` binary.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: tolerated parse errors, unusable catalogs
//! - `info`: stage outcomes, registry changes, fallback decoding
//! - `debug`: per-check results, document reads
//! - `trace`: unused
//!
//! # Usage
//!
//! ```ignore
//! use buf_cli::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig {
//!     level_filter: LevelFilter::DEBUG,
//!     ..LogConfig::default()
//! };
//! init_logging(&config)?;
//! ```

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events follow the configured level.
const WORKSPACE_TARGETS: [&str; 5] = [
    "buf_catalog",
    "buf_cli",
    "buf_ingest",
    "buf_model",
    "buf_validate",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level applied to the workspace crates.
    pub level_filter: LevelFilter,
    /// Whether `RUST_LOG` may override `level_filter`.
    pub use_env_filter: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Optional log file path. When set, logs are appended to the file.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-field format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON format for machine parsing, with span close events.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

impl LogConfig {
    /// Filter directives for the configured level.
    pub fn directives(&self) -> String {
        let level = self.level_filter.to_string().to_lowercase();
        let mut directives = vec![LevelFilter::WARN.to_string().to_lowercase()];
        directives.extend(
            WORKSPACE_TARGETS
                .iter()
                .map(|target| format!("{target}={level}")),
        );
        directives.join(",")
    }
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// This should be called once at application startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        install(config, Mutex::new(file));
    } else {
        install(config, io::stderr);
    }
    Ok(())
}

fn install<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = build_env_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_target(false)
                    .with_span_events(fmt::format::FmtSpan::CLOSE),
            )
            .init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(config.with_ansi)
                    .with_target(false)
                    .without_time(),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(config.with_ansi)
                    .with_target(false)
                    .without_time(),
            )
            .init(),
    }
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    if config.use_env_filter
        && let Ok(filter) = EnvFilter::try_from_default_env()
    {
        return filter;
    }
    // External crates stay at warn.
    EnvFilter::new(config.directives())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level_filter, LevelFilter::WARN);
        assert!(config.use_env_filter);
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_directives_cover_workspace_crates() {
        let config = LogConfig {
            level_filter: LevelFilter::DEBUG,
            ..LogConfig::default()
        };
        let directives = config.directives();
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("buf_validate=debug"));
        assert!(directives.contains("buf_ingest=debug"));
        assert!(directives.contains("buf_cli=debug"));
    }

    #[test]
    fn test_unopenable_log_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = LogConfig {
            log_file: Some(dir.path().join("absent").join("run.log")),
            ..LogConfig::default()
        };
        let err = init_logging(&config).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
