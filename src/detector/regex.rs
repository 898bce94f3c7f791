//! Regex-based PII detector

use super::{patterns::PatternRegistry, Detector, DetectorKind};
use crate::domain::text::CharOffsets;
use crate::domain::{EntityCandidate, PiiError, Result};
use std::sync::Arc;

/// Regex-based PII detector
///
/// Applies every pattern of its library in order, reporting each
/// non-overlapping match as a candidate with the pattern's confidence.
pub struct RegexDetector {
    pattern_registry: Arc<PatternRegistry>,
    min_confidence: f64,
}

impl RegexDetector {
    /// Create a new regex detector with default patterns
    pub fn new() -> anyhow::Result<Self> {
        let registry = PatternRegistry::default_patterns()?;
        Ok(Self::with_registry(registry))
    }

    /// Create a new regex detector with custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            pattern_registry: Arc::new(registry),
            min_confidence: 0.0,
        }
    }

    /// Skip patterns whose confidence is below `threshold`
    pub fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence = threshold.clamp(0.0, 1.0);
        self
    }

    /// Pattern library in use
    pub fn registry(&self) -> &PatternRegistry {
        &self.pattern_registry
    }
}

impl Detector for RegexDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Regex
    }

    fn detect(&self, text: &str) -> Result<Vec<EntityCandidate>> {
        let offsets = CharOffsets::new(text);
        let mut candidates = Vec::new();

        for pattern in self.pattern_registry.all_patterns() {
            if pattern.confidence < self.min_confidence {
                continue;
            }

            for matched in pattern.regex.find_iter(text) {
                if matched.is_empty() {
                    continue;
                }

                // Regex offsets are bytes; candidates use codepoints
                let (start, end) = match (
                    offsets.char_offset(matched.start()),
                    offsets.char_offset(matched.end()),
                ) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(PiiError::detector(
                            self.kind().source_tag(),
                            format!(
                                "pattern '{}' matched off a character boundary",
                                pattern.name
                            ),
                        ))
                    }
                };

                candidates.push(EntityCandidate {
                    entity_type: pattern.entity_type.clone(),
                    text: matched.as_str().to_string(),
                    start,
                    end,
                    confidence: pattern.confidence,
                    source: self.kind().source_tag().to_string(),
                });
            }
        }

        tracing::debug!(
            detector = %self.kind(),
            candidates = candidates.len(),
            "Regex detection complete"
        );

        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_email_and_phone() {
        let detector = RegexDetector::new().unwrap();
        let text = "Contact John at john@email.com or 555-123-4567";

        let candidates = detector.detect(text).unwrap();

        let email = candidates.iter().find(|c| c.entity_type == "email").unwrap();
        assert_eq!((email.start, email.end), (16, 30));
        assert_eq!(email.text, "john@email.com");
        assert_eq!(email.confidence, 0.8);
        assert_eq!(email.source, "regex");

        let phone = candidates.iter().find(|c| c.entity_type == "phone").unwrap();
        assert_eq!(phone.text, "555-123-4567");
    }

    #[test]
    fn test_detect_ssn() {
        let detector = RegexDetector::new().unwrap();
        let candidates = detector.detect("SSN: 123-45-6789").unwrap();
        assert!(candidates
            .iter()
            .any(|c| c.entity_type == "ssn" && c.text == "123-45-6789" && c.start == 5));
    }

    #[test]
    fn test_detect_uses_codepoint_offsets() {
        let detector = RegexDetector::new().unwrap();
        let text = "Écrire à zoe@exemple.fr";

        let candidates = detector.detect(text).unwrap();
        let email = candidates.iter().find(|c| c.entity_type == "email").unwrap();

        assert_eq!((email.start, email.end), (9, 23));
        assert_eq!(
            crate::domain::text::slice_chars(text, email.start, email.end),
            Some("zoe@exemple.fr")
        );
    }

    #[test]
    fn test_detect_nothing() {
        let detector = RegexDetector::new().unwrap();
        assert!(detector.detect("nothing to see here").unwrap().is_empty());
        assert!(detector.detect("").unwrap().is_empty());
    }

    #[test]
    fn test_min_confidence_skips_patterns() {
        let detector = RegexDetector::new().unwrap().with_min_confidence(0.9);
        assert!(detector.detect("john@email.com").unwrap().is_empty());
    }

    #[test]
    fn test_custom_registry() {
        let registry = PatternRegistry::from_toml(
            r#"
[[patterns]]
name = "mrn"
entity_type = "medical_record_number"
regex = 'MRN-\d{6}'
confidence = 0.95
"#,
        )
        .unwrap();
        let detector = RegexDetector::with_registry(registry);

        let candidates = detector.detect("Patient MRN-123456 admitted").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].entity_type, "medical_record_number");
        assert_eq!((candidates[0].start, candidates[0].end), (8, 18));
    }
}
