//! Configuration schema types
//!
//! This module defines the configuration structure for PII Fusion. Every section
//! has defaults, so an empty file is a valid configuration.

use crate::anonymization::Policy;
use crate::detector::DetectorKind;
use crate::report::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main PII Fusion configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PiiFusionConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detector selection and pattern library
    #[serde(default)]
    pub detectors: DetectorsConfig,

    /// Anonymization settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PiiFusionConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.detectors.validate()?;
        self.anonymization.validate()?;
        self.export.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Detector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorsConfig {
    /// Detectors to run; execution order is always regex, presidio, spacy
    #[serde(default = "default_enabled_detectors")]
    pub enabled: Vec<DetectorKind>,

    /// Custom pattern library for the regex detector (built-in library if unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,

    /// Regex patterns with a lower confidence are skipped
    #[serde(default)]
    pub min_confidence: f64,

    /// Run detectors on blocking worker threads concurrently
    #[serde(default = "default_true")]
    pub concurrent: bool,
}

impl DetectorsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled.is_empty() {
            return Err("detectors.enabled must name at least one detector".to_string());
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(format!(
                "detectors.min_confidence must be within 0.0 - 1.0, got {}",
                self.min_confidence
            ));
        }

        if let Some(ref path) = self.pattern_library {
            if !path.exists() {
                return Err(format!(
                    "detectors.pattern_library not found: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }
}

impl Default for DetectorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled_detectors(),
            pattern_library: None,
            min_confidence: 0.0,
            concurrent: true,
        }
    }
}

/// Anonymization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Policy name (placeholder, hash, mask, adaptive)
    ///
    /// Kept as free text: unknown names fall back to `placeholder` at run time.
    #[serde(default = "default_policy")]
    pub policy: String,
}

impl AnonymizationConfig {
    /// Policy this configuration resolves to
    pub fn policy(&self) -> Policy {
        Policy::from_name(&self.policy)
    }

    fn validate(&self) -> Result<(), String> {
        if self.policy.trim().is_empty() {
            return Err("anonymization.policy cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (text, json, csv, summary)
    #[serde(default = "default_export_format")]
    pub format: String,
}

impl ExportConfig {
    /// Format this configuration resolves to
    pub fn format(&self) -> ExportFormat {
        ExportFormat::from_name(&self.format)
    }

    fn validate(&self) -> Result<(), String> {
        ExportFormat::parse(&self.format).map(|_| ()).ok_or_else(|| {
            format!(
                "Invalid export.format '{}'. Must be one of: {}",
                self.format,
                ExportFormat::ALL.map(|f| f.as_str()).join(", ")
            )
        })
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_export_format(),
        }
    }
}

/// Audit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Record every anonymization run
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Write JSON lines instead of plain text
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to local files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_enabled_detectors() -> Vec<DetectorKind> {
    DetectorKind::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

fn default_policy() -> String {
    Policy::default().as_str().to_string()
}

fn default_export_format() -> String {
    ExportFormat::default().as_str().to_string()
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/pii-fusion-audit.log")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
