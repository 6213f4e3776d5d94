//! CLI argument definitions for the BUF upload validator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "buf-validator",
    version,
    about = "Validate Bulk Update Facility CSV uploads",
    long_about = "Validate Bulk Update Facility CSV uploads before they are loaded.\n\n\
                  Checks run in three stages (file, data, logic); a stage only runs\n\
                  when every check of the previous stage passed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one or more uploads.
    Validate(ValidateArgs),

    /// List registered validator types.
    Types(CatalogArgs),

    /// Show the checks of one validator type.
    Show(ShowArgs),
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Additional rule catalog (TOML). A catalog with a registered name
    /// replaces that validator.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalogs: Vec<PathBuf>,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Upload files to validate.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Validator type (default: the first available one).
    #[arg(long = "type", short = 't', value_name = "NAME")]
    pub validator_type: Option<String>,

    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: ReportFormatArg,

    /// Directory for annotated working-frame exports.
    #[arg(long = "annotated", value_name = "DIR")]
    pub annotated: Option<PathBuf>,
}

#[derive(Parser)]
pub struct ShowArgs {
    /// Validator type name.
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(flatten)]
    pub catalog: CatalogArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Table,
    Json,
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
