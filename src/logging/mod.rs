//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr
//! - Configurable log levels, overridable with `RUST_LOG`
//! - JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use pii_fusion::logging::init_logging;
//! use pii_fusion::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the completion of a fusion pass
///
/// # Example
///
/// ```no_run
/// use pii_fusion::log_fusion_complete;
///
/// log_fusion_complete!(5, 3);
/// ```
#[macro_export]
macro_rules! log_fusion_complete {
    ($candidates:expr, $merged:expr) => {
        tracing::debug!(
            candidates = $candidates,
            merged = $merged,
            "Fusion completed"
        );
    };
}

/// Log the completion of an anonymization pass
///
/// # Example
///
/// ```no_run
/// use pii_fusion::log_anonymization_complete;
/// use pii_fusion::anonymization::Policy;
///
/// log_anonymization_complete!(Policy::Hash, 3, 2);
/// ```
#[macro_export]
macro_rules! log_anonymization_complete {
    ($policy:expr, $entities:expr, $replaced:expr) => {
        tracing::debug!(
            policy = %$policy,
            entities = $entities,
            replaced = $replaced,
            "Anonymization completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use pii_fusion::log_error_with_context;
/// use pii_fusion::domain::PiiError;
///
/// let error = PiiError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::anonymization::Policy;
    use crate::domain::PiiError;

    #[test]
    fn test_macros_expand() {
        let error = PiiError::Validation("bad span".to_string());
        crate::log_fusion_complete!(4usize, 2usize);
        crate::log_anonymization_complete!(Policy::Mask, 2usize, 1usize);
        crate::log_error_with_context!(&error, "while testing");
    }
}
