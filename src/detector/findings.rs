//! Adapter for findings produced by external NER engines
//!
//! Engines such as Presidio or spaCy run outside this process. Their output is
//! handed over as a JSON array of findings and replayed as candidates tagged
//! with the engine's source tag.

use super::{Detector, DetectorKind};
use crate::domain::text::slice_chars;
use crate::domain::{EntityCandidate, PiiError, Result};
use serde::Deserialize;
use std::path::Path;

/// One finding as reported by an external engine
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Finding {
    /// Entity label; normalised to lowercase
    pub entity_type: String,
    /// Start codepoint offset (inclusive)
    pub start: usize,
    /// End codepoint offset (exclusive)
    pub end: usize,
    /// Confidence; Presidio calls this `score`
    #[serde(alias = "score")]
    pub confidence: f64,
    /// Span text as the engine saw it
    #[serde(default)]
    pub text: Option<String>,
}

/// Detector replaying pre-computed findings
#[derive(Debug, Clone)]
pub struct FindingsDetector {
    kind: DetectorKind,
    findings: Vec<Finding>,
}

impl FindingsDetector {
    pub fn new(kind: DetectorKind, findings: Vec<Finding>) -> Self {
        Self { kind, findings }
    }

    /// Parse findings from a JSON array
    ///
    /// # Errors
    ///
    /// Returns [`PiiError::Validation`] if the JSON is malformed or a field is out
    /// of range (e.g. a negative offset).
    pub fn from_json(kind: DetectorKind, json: &str) -> Result<Self> {
        let findings: Vec<Finding> = serde_json::from_str(json)
            .map_err(|e| PiiError::Validation(format!("Invalid {kind} findings: {e}")))?;
        Ok(Self::new(kind, findings))
    }

    /// Read findings from a JSON file
    pub fn from_file(kind: DetectorKind, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PiiError::Io(format!(
                "Failed to read {kind} findings {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(kind, &json)
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }
}

impl Detector for FindingsDetector {
    fn kind(&self) -> DetectorKind {
        self.kind
    }

    fn detect(&self, text: &str) -> Result<Vec<EntityCandidate>> {
        self.findings
            .iter()
            .map(|finding| {
                let candidate = EntityCandidate::from_text(
                    text,
                    finding.entity_type.to_lowercase(),
                    finding.start,
                    finding.end,
                    finding.confidence,
                    self.kind.source_tag(),
                )?;

                if let Some(reported) = finding.text.as_deref() {
                    if Some(reported) != slice_chars(text, finding.start, finding.end) {
                        tracing::warn!(
                            detector = %self.kind,
                            start = finding.start,
                            end = finding.end,
                            "Finding text does not match the analysed text, using the span"
                        );
                    }
                }

                Ok(candidate)
            })
            .collect()
    }
}
