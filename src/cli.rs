//! CLI arguments and subcommands for jstat-exporter.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use jstat_exporter::ReportMode;
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "jstat-exporter",
    about = "Prometheus exporter for JVM memory pool metrics sampled with jstat",
    long_about = "Prometheus exporter for JVM memory pool metrics sampled with jstat.\n\n\
                  Every scrape runs jstat once per enabled report mode against the target \
                  JVM and exposes the selected columns as gauges. Failed report modes keep \
                  serving their last known values.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Path under which to expose metrics
    #[arg(long, alias = "web.telemetry-path")]
    pub metrics_path: Option<String>,

    /// Path of the jstat executable
    #[arg(long, alias = "jstat.path")]
    pub jstat_path: Option<PathBuf>,

    /// Target JVM process id (jstat vmid)
    #[arg(long, alias = "target.pid")]
    pub target_pid: Option<String>,

    /// Timeout for a single jstat invocation in milliseconds
    #[arg(long)]
    pub sampler_timeout_ms: Option<u64>,

    /// Report mode to sample (repeatable, default: all)
    #[arg(long = "report", value_enum)]
    pub reports: Vec<ReportMode>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Disable /health endpoint
    #[arg(long)]
    pub disable_health: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check runtime requirements (jstat executable, target process)
    Check,

    /// Run scrapes once and print the results
    Test {
        /// Number of scrapes
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,
    },
}
