//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PII Fusion using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code when detection, anonymization or export fails
pub const EXIT_PROCESSING_ERROR: i32 = 1;
/// Exit code for configuration or input problems
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// PII Fusion - multi-detector PII detection and anonymization
#[derive(Parser, Debug)]
#[command(name = "pii-fusion")]
#[command(version, about, long_about = None)]
#[command(author = "PII Fusion Contributors")]
#[command(after_help = "Example: echo 'Contact John at john@email.com' | pii-fusion anonymize --policy adaptive")]
pub struct Cli {
    /// Path to configuration file (defaults to ./pii-fusion.toml when present)
    #[arg(short, long, env = "PII_FUSION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PII_FUSION_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect and anonymize PII in text from a file or stdin
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
