//! CLI command implementations.

pub mod apply;
pub mod check;
pub mod config;
pub mod headers;

use clap::{Args, Subcommand};
use edge_observability::{LogFormat, LogLevel};

/// Arguments for the apply command.
#[derive(Args)]
pub struct ApplyArgs {
    /// Event JSON file (reads stdin when omitted or `-`).
    pub input: Option<String>,

    /// Pretty-print the resulting response.
    #[arg(short, long)]
    pub pretty: bool,

    /// Print which headers were inserted or overwritten.
    #[arg(short, long)]
    pub report: bool,

    /// Minimum level of function log entries (overrides `[logging] level`).
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Function log format, `json` or `human` (overrides `[logging] format`).
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Event or bare response JSON file (reads stdin when omitted or `-`).
    pub input: Option<String>,

    /// Additional required header, as `name=value` (repeatable).
    #[arg(long = "require", value_name = "NAME=VALUE")]
    pub require: Vec<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
