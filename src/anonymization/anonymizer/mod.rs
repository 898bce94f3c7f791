//! Anonymization strategy module
//!
//! Each strategy is a pure function from a merged entity to its substitution
//! string. `None` means "no replacement": the entity is still recorded but the
//! text at its span is left untouched.

pub mod adaptive;
pub mod hash;
pub mod mask;
pub mod placeholder;

use super::policy::Policy;
use crate::domain::MergedEntity;

/// Trait for anonymization strategy implementations
pub trait Anonymizer: Send + Sync {
    /// Substitution for `entity`, or `None` to leave its span as is
    fn anonymize(&self, entity: &MergedEntity) -> Option<String>;

    /// The policy this strategy implements
    fn policy(&self) -> Policy;
}

/// Upper-cased entity type used inside bracketed tokens
pub(crate) fn type_label(entity: &MergedEntity) -> String {
    entity.entity_type.to_uppercase()
}

#[cfg(test)]
pub(crate) fn test_entity(entity_type: &str, text: &str, confidence: f64) -> MergedEntity {
    MergedEntity {
        entity_type: entity_type.to_string(),
        text: text.to_string(),
        start: 0,
        end: text.chars().count(),
        confidence,
        source: "regex".to_string(),
    }
}
