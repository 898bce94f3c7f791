//! Configuration management for PII Fusion.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! PII Fusion uses an optional TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - Environment overrides (`PII_FUSION_<SECTION>_<KEY>`)
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pii_fusion::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("pii-fusion.toml")?;
//!
//! println!("Policy: {}", config.anonymization.policy());
//! println!("Detectors: {:?}", config.detectors.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`DetectorsConfig`] - Enabled detectors and pattern library
//! - [`AnonymizationConfig`] - Anonymization policy
//! - [`ExportConfig`] - Output format
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [detectors]
//! enabled = ["regex", "presidio", "spacy"]
//! pattern_library = "./patterns/custom.toml"
//!
//! [anonymization]
//! policy = "${PII_POLICY}"
//!
//! [export]
//! format = "text"
//!
//! [audit]
//! enabled = true
//! log_path = "./audit/pii-fusion-audit.log"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_or_default, parse_config, DEFAULT_CONFIG_FILE};
pub use schema::{
    AnonymizationConfig, ApplicationConfig, AuditConfig, DetectorsConfig, ExportConfig,
    LoggingConfig, PiiFusionConfig,
};
