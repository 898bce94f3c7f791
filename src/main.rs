// PII Fusion - Multi-detector PII fusion and anonymization
// Copyright (c) 2025 PII Fusion Contributors
// Licensed under the MIT License

use clap::Parser;
use pii_fusion::cli::{Cli, Commands, EXIT_PROCESSING_ERROR};
use pii_fusion::config::{load_or_default, LoggingConfig};
use pii_fusion::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging follows the configuration when it loads; commands report
    // configuration errors themselves
    let config = load_or_default(cli.config.as_deref()).ok();
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config
        .map(|c| c.logging)
        .unwrap_or_else(LoggingConfig::default);

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(pii_fusion::cli::EXIT_CONFIG_ERROR);
        }
    };

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "PII Fusion starting");

    // Stop signal for interactive mode
    let (stop_tx, stop_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        } else {
            tracing::info!("Received SIGINT (Ctrl+C), stopping");
            let _ = stop_tx.send(true);
        }
    });

    let exit_code = match execute_command(&cli, stop_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            EXIT_PROCESSING_ERROR
        }
    };

    // Flush file logs, then exit without waiting on a blocked stdin reader
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, stop_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Anonymize(args) => args.execute(cli.config.as_deref(), stop_signal).await,
        Commands::ValidateConfig(args) => args.execute(cli.config.as_deref()).await,
        Commands::Init(args) => args.execute().await,
    }
}
