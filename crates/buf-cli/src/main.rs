//! BUF upload validator CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use buf_cli::logging::{LogConfig, LogFormat, init_logging};

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_show, run_types, run_validate};

/// Every report passed.
const EXIT_PASSED: i32 = 0;
/// At least one report failed.
const EXIT_FAILED: i32 = 1;
/// The run could not complete.
const EXIT_FATAL: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FATAL);
    }
    let color = cli.color.color;
    let outcome = match &cli.command {
        Command::Validate(args) => run_validate(args, color).map(|passed| {
            if passed { EXIT_PASSED } else { EXIT_FAILED }
        }),
        Command::Types(args) => run_types(args, color).map(|()| EXIT_PASSED),
        Command::Show(args) => run_show(args, color).map(|()| EXIT_PASSED),
    };
    let exit_code = match outcome {
        Ok(code) => code,
        Err(error) => {
            tracing::error!(error = %error, "run failed");
            eprintln!("error: {error:#}");
            EXIT_FATAL
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = cli.log_level.is_none();
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
