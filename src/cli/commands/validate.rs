//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the PII Fusion configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_or_default, PiiFusionConfig};
use crate::detector::PatternRegistry;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let shown = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(default)".to_string());
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("Validating configuration: {shown}");
        println!();

        let config = match load_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let patterns = match config.detectors.pattern_library {
            Some(ref path) => PatternRegistry::from_file(path),
            None => PatternRegistry::default_patterns(),
        };
        let patterns = match patterns {
            Ok(registry) => registry.len(),
            Err(e) => {
                println!("Pattern library is invalid");
                println!("   Error: {e:#}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("Configuration is valid");
        println!();
        print!("{}", summary(&config, patterns));
        Ok(EXIT_SUCCESS)
    }
}

fn summary(config: &PiiFusionConfig, patterns: usize) -> String {
    let detectors: Vec<String> = config.detectors.enabled.iter().map(|d| d.to_string()).collect();
    let library = config
        .detectors
        .pattern_library
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());

    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Detectors: {}", detectors.join(", ")),
        format!("  Pattern Library: {library} ({patterns} patterns)"),
        format!("  Concurrent Detection: {}", config.detectors.concurrent),
        format!("  Policy: {}", config.anonymization.policy()),
        format!("  Export Format: {}", config.export.format()),
    ];
    if config.audit.enabled {
        lines.push(format!("  Audit Log: {}", config.audit.log_path.display()));
    }
    if config.logging.local_enabled {
        lines.push(format!(
            "  File Logging: {} ({})",
            config.logging.local_path, config.logging.local_rotation
        ));
    }

    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_summary_lists_settings() {
        let summary = summary(&PiiFusionConfig::default(), 8);
        assert!(summary.contains("  Detectors: regex, presidio, spacy"));
        assert!(summary.contains("  Pattern Library: built-in (8 patterns)"));
        assert!(summary.contains("  Policy: adaptive"));
        assert!(!summary.contains("Audit Log"));
    }

    #[tokio::test]
    async fn test_execute_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[anonymization]\npolicy = \"mask\"\n").unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}.execute(Some(file.path())).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_execute_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[export]\nformat = \"xml\"\n").unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}.execute(Some(file.path())).await.unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
