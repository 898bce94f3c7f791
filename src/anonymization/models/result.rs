//! Anonymization result data models

use crate::anonymization::policy::Policy;
use crate::domain::MergedEntity;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Confidence above which an entity counts as `high`
pub const HIGH_BUCKET_THRESHOLD: f64 = 0.8;
/// Confidence above which an entity counts as `medium`
pub const MEDIUM_BUCKET_THRESHOLD: f64 = 0.6;

/// Merged entity with its substitution attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedEntity {
    /// The fused entity
    #[serde(flatten)]
    pub entity: MergedEntity,
    /// Substitution applied at the entity's span; `None` if the span was left as is
    pub anonymized_value: Option<String>,
}

impl AnonymizedEntity {
    /// Whether a substitution was applied
    pub fn is_replaced(&self) -> bool {
        self.anonymized_value.is_some()
    }
}

/// Confidence histogram bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBucket {
    /// `> 0.8`
    High,
    /// `> 0.6`
    Medium,
    /// Everything else
    Low,
}

impl ConfidenceBucket {
    /// Bucket for a confidence score
    pub fn of(confidence: f64) -> Self {
        if confidence > HIGH_BUCKET_THRESHOLD {
            Self::High
        } else if confidence > MEDIUM_BUCKET_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Confidence histogram
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConfidenceDistribution {
    /// Count one entity in its bucket
    pub fn record(&mut self, confidence: f64) {
        match ConfidenceBucket::of(confidence) {
            ConfidenceBucket::High => self.high += 1,
            ConfidenceBucket::Medium => self.medium += 1,
            ConfidenceBucket::Low => self.low += 1,
        }
    }

    /// Total entities counted
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Aggregate statistics over merged entities
///
/// Computed independently of the policy. Maps keep first-seen order, which
/// follows ascending entity position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationStats {
    /// Number of merged entities
    pub total_entities: usize,
    /// Count per entity type
    pub entity_types: IndexMap<String, usize>,
    /// Count per (possibly composite) source tag
    pub sources: IndexMap<String, usize>,
    /// Confidence histogram
    pub confidence_distribution: ConfidenceDistribution,
}

impl AnonymizationStats {
    /// Compute statistics over `entities`
    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a MergedEntity>) -> Self {
        let mut stats = Self::default();
        for entity in entities {
            stats.total_entities += 1;
            *stats
                .entity_types
                .entry(entity.entity_type.clone())
                .or_insert(0) += 1;
            *stats.sources.entry(entity.source.clone()).or_insert(0) += 1;
            stats.confidence_distribution.record(entity.confidence);
        }
        stats
    }
}

/// Result of anonymizing one text
///
/// Owned by the caller once returned; reporting only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationResult {
    /// Input text
    pub original_text: String,
    /// Text after all substitutions
    pub anonymized_text: String,
    /// Entities in ascending position with their substitutions
    pub entities: Vec<AnonymizedEntity>,
    /// Original value -> substitution; the last processed occurrence of a value wins
    pub mapping: IndexMap<String, Option<String>>,
    /// Aggregate statistics
    pub stats: AnonymizationStats,
    /// Policy applied
    pub policy: Policy,
}

impl AnonymizationResult {
    /// Result for a text without entities
    pub fn unchanged(text: &str, policy: Policy) -> Self {
        Self {
            original_text: text.to_string(),
            anonymized_text: text.to_string(),
            entities: Vec::new(),
            mapping: IndexMap::new(),
            stats: AnonymizationStats::default(),
            policy,
        }
    }

    /// Get total number of entities
    pub fn total_entities(&self) -> usize {
        self.entities.len()
    }

    /// Check if any entity was found
    pub fn has_entities(&self) -> bool {
        !self.entities.is_empty()
    }

    /// Number of entities whose span was substituted
    pub fn replaced_count(&self) -> usize {
        self.entities.iter().filter(|e| e.is_replaced()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(entity_type: &str, source: &str, confidence: f64, start: usize) -> MergedEntity {
        MergedEntity {
            entity_type: entity_type.to_string(),
            text: "x".to_string(),
            start,
            end: start + 1,
            confidence,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_confidence_buckets() {
        assert_eq!(ConfidenceBucket::of(0.81), ConfidenceBucket::High);
        assert_eq!(ConfidenceBucket::of(0.8), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::of(0.61), ConfidenceBucket::Medium);
        assert_eq!(ConfidenceBucket::of(0.6), ConfidenceBucket::Low);
        assert_eq!(ConfidenceBucket::of(0.0), ConfidenceBucket::Low);
    }

    #[test]
    fn test_stats_from_entities() {
        let entities = vec![
            entity("person", "spacy", 1.0, 0),
            entity("email", "regex", 0.8, 2),
            entity("person", "regex+spacy", 0.5, 4),
        ];

        let stats = AnonymizationStats::from_entities(&entities);
        assert_eq!(stats.total_entities, 3);
        assert_eq!(stats.entity_types.get("person"), Some(&2));
        assert_eq!(
            stats.entity_types.keys().collect::<Vec<_>>(),
            vec!["person", "email"]
        );
        assert_eq!(stats.sources.len(), 3);
        assert_eq!(
            stats.confidence_distribution,
            ConfidenceDistribution {
                high: 1,
                medium: 1,
                low: 1
            }
        );
    }

    #[test]
    fn test_anonymized_entity_serializes_flat() {
        let anonymized = AnonymizedEntity {
            entity: entity("email", "regex", 0.8, 0),
            anonymized_value: None,
        };
        let json = serde_json::to_value(&anonymized).unwrap();
        assert_eq!(json["entity_type"], "email");
        assert!(json["anonymized_value"].is_null());
    }

    #[test]
    fn test_unchanged_result() {
        let result = AnonymizationResult::unchanged("no pii here", Policy::Mask);
        assert_eq!(result.anonymized_text, "no pii here");
        assert!(!result.has_entities());
        assert_eq!(result.replaced_count(), 0);
    }
}
