//! Result type alias for PII Fusion

use super::errors::PiiError;

/// Result type alias for PII Fusion operations
///
/// # Examples
///
/// ```
/// use pii_fusion::domain::{PiiError, Result};
///
/// fn check_span(start: usize, end: usize) -> Result<()> {
///     if start >= end {
///         return Err(PiiError::invalid_span(start, end, 0));
///     }
///     Ok(())
/// }
///
/// assert!(check_span(0, 4).is_ok());
/// assert!(check_span(4, 4).is_err());
/// ```
pub type Result<T> = std::result::Result<T, PiiError>;
