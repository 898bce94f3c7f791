//! Placeholder anonymization strategy

use super::{type_label, Anonymizer};
use crate::anonymization::policy::Policy;
use crate::domain::MergedEntity;

/// Placeholder strategy - replaces PII with `[TYPE_REDACTED]` tokens
pub struct PlaceholderStrategy;

impl PlaceholderStrategy {
    /// Create a new placeholder strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for PlaceholderStrategy {
    fn anonymize(&self, entity: &MergedEntity) -> Option<String> {
        Some(format!("[{}_REDACTED]", type_label(entity)))
    }

    fn policy(&self) -> Policy {
        Policy::Placeholder
    }
}

impl Default for PlaceholderStrategy {
    fn default() -> Self {
        Self::new()
    }
}
