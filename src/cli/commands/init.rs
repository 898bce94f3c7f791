//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_PROCESSING_ERROR, EXIT_SUCCESS};
use crate::config::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Include comments explaining every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output.display(), "Initializing configuration file");

        if self.output.exists() && !self.force {
            eprintln!(
                "Configuration file already exists: {}",
                self.output.display()
            );
            eprintln!("Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output.display());
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output.display());
                println!("  2. Validate configuration: pii-fusion validate-config");
                println!("  3. Run: echo 'Contact John at john@email.com' | pii-fusion anonymize");
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Failed to write configuration file: {e}");
                Ok(EXIT_PROCESSING_ERROR)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# PII Fusion Configuration File

[application]
log_level = "info"

[detectors]
enabled = ["regex", "presidio", "spacy"]
min_confidence = 0.0
concurrent = true

[anonymization]
policy = "adaptive"

[export]
format = "text"

[audit]
enabled = false
log_path = "./audit/pii-fusion-audit.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# PII Fusion Configuration File
#
# Every setting is optional. Values may reference environment variables with
# ${VAR_NAME}, and any key can be overridden with PII_FUSION_<SECTION>_<KEY>,
# e.g. PII_FUSION_ANONYMIZATION_POLICY=hash.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
log_level = "info"

# ============================================================================
# Detectors
# ============================================================================
[detectors]
# Detectors to run. They always execute in the order regex, presidio, spacy,
# which decides ties between equally confident overlapping findings.
# presidio and spacy need pre-computed findings (anonymize --findings KIND=PATH)
enabled = ["regex", "presidio", "spacy"]

# Custom pattern library for the regex detector ([[patterns]] tables with
# name, entity_type, regex, confidence). Built-in library when unset.
# pattern_library = "./patterns/custom.toml"

# Regex patterns below this confidence are skipped
min_confidence = 0.0

# Run detectors concurrently on worker threads
concurrent = true

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# placeholder: [EMAIL_REDACTED]
# hash:        [EMAIL_1a2b3c4d]  (first 8 hex chars of md5)
# mask:        jo**********om    (same length as the original)
# adaptive:    format depends on confidence (> 0.9 partial reveal,
#              > 0.7 short hash, otherwise [EMAIL_POSSIBLE])
# Unknown names fall back to placeholder.
policy = "adaptive"
# policy = "${PII_POLICY}"

# ============================================================================
# Export
# ============================================================================
[export]
# text (anonymized text only), json, csv or summary
format = "text"

# ============================================================================
# Audit Trail
# ============================================================================
[audit]
# Append one record per anonymized text. Values are stored as SHA-256 hashes.
enabled = false
log_path = "./audit/pii-fusion-audit.log"
# JSON lines (true) or one plain-text line per run (false)
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to local files in addition to stderr
local_enabled = false
local_path = "./logs"
# daily, hourly or never
local_rotation = "daily"
"#
        .to_string()
    }
}
