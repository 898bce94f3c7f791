//! Sweep-line merge of detector candidates

use crate::domain::{EntityCandidate, MergedEntity, SOURCE_SEPARATOR};

/// Merge candidates from all detectors into a canonical, non-overlapping list
///
/// Candidates are stable-sorted by `start`, so for equal starts the input order
/// (detector priority order) decides which candidate becomes the accumulator.
/// Two spans are fused when they overlap or touch. The winner of a fusion is the
/// side with the strictly higher confidence, ties keep the accumulator. The fused
/// entity takes the winner's type, text and confidence, the union span, and the
/// source tags joined as `current+next`.
///
/// The fused `text` is copied from the winner and is not re-sliced from the union
/// span, so it may differ from `original[start..end]` after a fusion.
///
/// This function performs no bounds checking; see
/// [`validate_candidates`](super::validate_candidates).
///
/// # Examples
///
/// ```
/// use pii_fusion::domain::EntityCandidate;
/// use pii_fusion::fusion::merge;
///
/// let text = "Hello John Smith";
/// let regex = EntityCandidate::from_text(text, "person_name", 6, 10, 0.6, "regex").unwrap();
/// let ner = EntityCandidate::from_text(text, "person", 6, 16, 0.95, "spacy").unwrap();
///
/// let merged = merge(vec![regex, ner]);
/// assert_eq!(merged.len(), 1);
/// assert_eq!(merged[0].entity_type, "person");
/// assert_eq!(merged[0].source, "regex+spacy");
/// assert_eq!((merged[0].start, merged[0].end), (6, 16));
/// ```
pub fn merge(mut candidates: Vec<EntityCandidate>) -> Vec<MergedEntity> {
    // Vec::sort_by_key is stable
    candidates.sort_by_key(|c| c.start);

    let mut iter = candidates.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut merged = Vec::new();
    let mut current = MergedEntity::from(first);

    for next in iter {
        if overlaps(&current, &next) {
            current = fuse(current, next);
        } else {
            merged.push(current);
            current = MergedEntity::from(next);
        }
    }

    merged.push(current);
    merged
}

/// Re-run fusion over already merged entities
///
/// Merged output is pairwise disjoint, so this returns the same spans.
pub fn remerge(entities: &[MergedEntity]) -> Vec<MergedEntity> {
    merge(entities.iter().map(MergedEntity::to_candidate).collect())
}

/// Overlap predicate; touching spans count as overlapping
pub(crate) fn overlaps(current: &MergedEntity, next: &EntityCandidate) -> bool {
    next.start <= current.end && next.end >= current.start
}

fn fuse(current: MergedEntity, next: EntityCandidate) -> MergedEntity {
    let start = current.start.min(next.start);
    let end = current.end.max(next.end);
    let source = format!("{}{}{}", current.source, SOURCE_SEPARATOR, next.source);

    if next.confidence > current.confidence {
        MergedEntity {
            entity_type: next.entity_type,
            text: next.text,
            start,
            end,
            confidence: next.confidence,
            source,
        }
    } else {
        MergedEntity {
            start,
            end,
            source,
            ..current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(
        entity_type: &str,
        text: &str,
        start: usize,
        end: usize,
        confidence: f64,
        source: &str,
    ) -> EntityCandidate {
        EntityCandidate {
            entity_type: entity_type.to_string(),
            text: text.to_string(),
            start,
            end,
            confidence,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_single_candidate_unchanged() {
        let c = candidate("email", "john@email.com", 16, 30, 0.8, "regex");
        let merged = merge(vec![c.clone()]);
        assert_eq!(merged, vec![MergedEntity::from(c)]);
    }

    #[test]
    fn test_merge_same_span_higher_confidence_wins() {
        let merged = merge(vec![
            candidate("person_name", "John", 8, 12, 0.6, "regex"),
            candidate("person", "John", 8, 12, 0.95, "ner"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entity_type, "person");
        assert_eq!(merged[0].confidence, 0.95);
        assert_eq!(merged[0].source, "regex+ner");
    }

    #[test]
    fn test_merge_tie_keeps_current() {
        let merged = merge(vec![
            candidate("phone", "555-1234", 0, 8, 0.8, "regex"),
            candidate("ssn", "555-1234", 0, 8, 0.8, "presidio"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entity_type, "phone");
        assert_eq!(merged[0].source, "regex+presidio");
    }

    #[test]
    fn test_merge_touching_spans_fuse() {
        let merged = merge(vec![
            candidate("person", "John", 0, 4, 0.9, "spacy"),
            candidate("person", "Smith", 4, 9, 0.7, "regex"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].start, merged[0].end), (0, 9));
        // Text is the winner's, not the union slice
        assert_eq!(merged[0].text, "John");
    }

    #[test]
    fn test_merge_disjoint_spans_kept_apart() {
        let merged = merge(vec![
            candidate("email", "a@b.io", 10, 16, 0.8, "regex"),
            candidate("person", "Ann", 0, 3, 0.9, "spacy"),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "Ann");
        assert_eq!(merged[1].text, "a@b.io");
    }

    #[test]
    fn test_merge_source_order_independent_of_winner() {
        let merged = merge(vec![
            candidate("credit_card", "4532 1234", 0, 9, 0.99, "presidio"),
            candidate("phone", "1234", 5, 9, 0.5, "regex"),
        ]);

        assert_eq!(merged[0].source, "presidio+regex");
        assert_eq!(merged[0].entity_type, "credit_card");
    }

    #[test]
    fn test_merge_chain_accumulates_sources() {
        let merged = merge(vec![
            candidate("a", "aaaa", 0, 4, 0.5, "regex"),
            candidate("b", "bbbb", 3, 7, 0.7, "presidio"),
            candidate("c", "cccc", 6, 10, 0.6, "spacy"),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entity_type, "b");
        assert_eq!(merged[0].source, "regex+presidio+spacy");
        assert_eq!((merged[0].start, merged[0].end), (0, 10));
    }

    #[test]
    fn test_remerge_is_idempotent() {
        let first = merge(vec![
            candidate("a", "aa", 0, 2, 0.5, "regex"),
            candidate("b", "bb", 1, 3, 0.7, "spacy"),
            candidate("c", "cc", 10, 12, 0.9, "regex"),
        ]);
        let second = remerge(&first);

        let spans = |v: &[MergedEntity]| v.iter().map(|e| (e.start, e.end)).collect::<Vec<_>>();
        assert_eq!(spans(&first), spans(&second));
    }
}
