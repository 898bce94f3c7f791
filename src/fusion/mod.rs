//! Fusion engine
//!
//! Merges heterogeneous, possibly overlapping and contradictory candidates from
//! several detectors into one canonical entity list that is sorted by `start`
//! and pairwise non-overlapping.
//!
//! [`merge`] is the pure algorithm and trusts its input. [`fuse_candidates`]
//! validates every candidate against the analysed text first, which is what
//! callers holding detector output should use.
//!
//! # Examples
//!
//! ```
//! use pii_fusion::domain::EntityCandidate;
//! use pii_fusion::fusion::fuse_candidates;
//!
//! # fn example() -> pii_fusion::domain::Result<()> {
//! let text = "Mail jane@corp.io today";
//! let candidates = vec![
//!     EntityCandidate::from_text(text, "email", 5, 17, 0.8, "regex")?,
//!     EntityCandidate::from_text(text, "email_address", 5, 17, 1.0, "presidio")?,
//! ];
//!
//! let merged = fuse_candidates(text, candidates)?;
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].source, "regex+presidio");
//! # Ok(())
//! # }
//! ```

pub mod merge;

pub use merge::{merge, remerge};

use crate::domain::text::char_len;
use crate::domain::{EntityCandidate, MergedEntity, Result};

/// Check every candidate's span and confidence against `text`
///
/// # Errors
///
/// Returns the first [`PiiError::InvalidSpan`](crate::domain::PiiError::InvalidSpan)
/// or [`PiiError::InvalidConfidence`](crate::domain::PiiError::InvalidConfidence)
/// encountered. Nothing is dropped silently.
pub fn validate_candidates(text: &str, candidates: &[EntityCandidate]) -> Result<()> {
    let text_len = char_len(text);
    for candidate in candidates {
        candidate.validate(text_len).inspect_err(|e| {
            tracing::warn!(
                source = %candidate.source,
                entity_type = %candidate.entity_type,
                start = candidate.start,
                end = candidate.end,
                error = %e,
                "Rejected detector candidate"
            );
        })?;
    }
    Ok(())
}

/// Validate candidates against `text`, then merge them
pub fn fuse_candidates(text: &str, candidates: Vec<EntityCandidate>) -> Result<Vec<MergedEntity>> {
    validate_candidates(text, &candidates)?;

    let input_count = candidates.len();
    let merged = merge(candidates);
    crate::log_fusion_complete!(input_count, merged.len());

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PiiError;

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let text = "short";
        let candidate = EntityCandidate {
            entity_type: "person".to_string(),
            text: "shorter".to_string(),
            start: 0,
            end: 7,
            confidence: 0.9,
            source: "spacy".to_string(),
        };

        let err = fuse_candidates(text, vec![candidate]).unwrap_err();
        assert!(matches!(err, PiiError::InvalidSpan { text_len: 5, .. }));
    }

    #[test]
    fn test_fuse_empty_input() {
        assert!(fuse_candidates("", Vec::new()).unwrap().is_empty());
    }
}
