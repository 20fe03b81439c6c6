// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::DEFAULT_CONFIG_PATH;

/// Command-line arguments for `hostboot`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hostboot",
    version,
    about = "Wait for prerequisites, publish the instance region, then exec the container daemon.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If this is the default path and the file does not exist, built-in
    /// defaults are used.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HOSTBOOT_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the config and print the bootstrap plan without probing,
    /// fetching metadata or launching anything.
    #[arg(long, conflicts_with = "render_unit")]
    pub dry_run: bool,

    /// Print a systemd drop-in that runs hostboot as the daemon's ExecStart.
    #[arg(long)]
    pub render_unit: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
