//! Domain error types
//!
//! This module defines the error hierarchy for PII Fusion. All errors are local
//! and recoverable: the library never terminates the process, it returns a
//! [`PiiError`] and lets the caller decide whether to abort.

use thiserror::Error;

/// Main PII Fusion error type
#[derive(Debug, Error)]
pub enum PiiError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A span that does not fit the text it annotates
    #[error("Invalid span [{start}, {end}) for text of length {text_len}")]
    InvalidSpan {
        start: usize,
        end: usize,
        text_len: usize,
    },

    /// Confidence outside of [0, 1]
    #[error("Invalid confidence {0}: must be within [0.0, 1.0]")]
    InvalidConfidence(f64),

    /// A detector adapter failed to produce candidates
    #[error("Detector '{detector}' failed: {message}")]
    Detector { detector: String, message: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Export formatting errors
    #[error("Export error: {0}")]
    Export(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl PiiError {
    /// Creates an [`PiiError::InvalidSpan`]
    pub fn invalid_span(start: usize, end: usize, text_len: usize) -> Self {
        PiiError::InvalidSpan {
            start,
            end,
            text_len,
        }
    }

    /// Creates a [`PiiError::Detector`] for the named detector
    pub fn detector(detector: impl Into<String>, message: impl Into<String>) -> Self {
        PiiError::Detector {
            detector: detector.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a span or confidence validation failure
    pub fn is_validation_failure(&self) -> bool {
        matches!(
            self,
            PiiError::InvalidSpan { .. } | PiiError::InvalidConfidence(_) | PiiError::Validation(_)
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PiiError {
    fn from(err: std::io::Error) -> Self {
        PiiError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PiiError {
    fn from(err: serde_json::Error) -> Self {
        PiiError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PiiError {
    fn from(err: toml::de::Error) -> Self {
        PiiError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for PiiError {
    fn from(err: csv::Error) -> Self {
        PiiError::Export(err.to_string())
    }
}
