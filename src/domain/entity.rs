//! Entity data models
//!
//! [`EntityCandidate`] is a single detector's raw finding. [`MergedEntity`] is
//! the canonical unit produced by fusion, possibly combining several candidates.

use super::errors::PiiError;
use super::result::Result;
use super::text::{char_len, slice_chars};
use serde::{Deserialize, Serialize};

/// Separator used when combining detector source tags
pub const SOURCE_SEPARATOR: &str = "+";

/// A single detector finding, before cross-detector fusion
///
/// Spans are half-open codepoint ranges into the analysed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityCandidate {
    /// Entity type label as reported by the detector (e.g. `email`, `person`)
    pub entity_type: String,
    /// Literal text of the span
    pub text: String,
    /// Start codepoint offset (inclusive)
    pub start: usize,
    /// End codepoint offset (exclusive)
    pub end: usize,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
    /// Source tag identifying the detector
    pub source: String,
}

impl EntityCandidate {
    /// Create a candidate from the exact slice of `original` it annotates
    ///
    /// # Errors
    ///
    /// Returns [`PiiError::InvalidSpan`] if `[start, end)` is empty or exceeds the
    /// text, and [`PiiError::InvalidConfidence`] if `confidence` is outside [0, 1].
    pub fn from_text(
        original: &str,
        entity_type: impl Into<String>,
        start: usize,
        end: usize,
        confidence: f64,
        source: impl Into<String>,
    ) -> Result<Self> {
        let text = slice_chars(original, start, end)
            .ok_or_else(|| PiiError::invalid_span(start, end, char_len(original)))?;
        check_confidence(confidence)?;

        Ok(Self {
            entity_type: entity_type.into(),
            text: text.to_string(),
            start,
            end,
            confidence,
            source: source.into(),
        })
    }

    /// Span length in codepoints
    pub fn span_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check span bounds and confidence against a text of `text_len` codepoints
    pub fn validate(&self, text_len: usize) -> Result<()> {
        check_span(self.start, self.end, text_len)?;
        check_confidence(self.confidence)
    }
}

/// A canonical, fused entity
///
/// Has the same shape as [`EntityCandidate`]; `source` may be a composite of
/// several origin detectors joined with `+` (e.g. `regex+spacy`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedEntity {
    /// Entity type of the winning candidate
    pub entity_type: String,
    /// Literal text of the winning candidate (not re-sliced from the union span)
    pub text: String,
    /// Start of the union span
    pub start: usize,
    /// End of the union span
    pub end: usize,
    /// Confidence of the winning candidate
    pub confidence: f64,
    /// Composite source tag
    pub source: String,
}

impl MergedEntity {
    /// Span length in codepoints
    pub fn span_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Individual detector tags that contributed to this entity
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.source.split(SOURCE_SEPARATOR)
    }

    /// Whether more than one candidate was fused into this entity
    pub fn is_composite(&self) -> bool {
        self.source.contains(SOURCE_SEPARATOR)
    }

    /// Check span bounds against a text of `text_len` codepoints
    pub fn validate(&self, text_len: usize) -> Result<()> {
        check_span(self.start, self.end, text_len)?;
        check_confidence(self.confidence)
    }

    /// Re-expose this entity as a candidate, e.g. to feed it through fusion again
    pub fn to_candidate(&self) -> EntityCandidate {
        EntityCandidate {
            entity_type: self.entity_type.clone(),
            text: self.text.clone(),
            start: self.start,
            end: self.end,
            confidence: self.confidence,
            source: self.source.clone(),
        }
    }
}

impl From<EntityCandidate> for MergedEntity {
    fn from(candidate: EntityCandidate) -> Self {
        Self {
            entity_type: candidate.entity_type,
            text: candidate.text,
            start: candidate.start,
            end: candidate.end,
            confidence: candidate.confidence,
            source: candidate.source,
        }
    }
}

fn check_span(start: usize, end: usize, text_len: usize) -> Result<()> {
    if start >= end || end > text_len {
        return Err(PiiError::invalid_span(start, end, text_len));
    }
    Ok(())
}

fn check_confidence(confidence: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(PiiError::InvalidConfidence(confidence));
    }
    Ok(())
}
