//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that rewrites a text given
//! its canonical (fused) entities and a [`Policy`].
//!
//! # Offset safety
//!
//! Substitutions are applied directly on a single codepoint buffer at each
//! entity's `[start, end)` range, in **descending** `start` order. Replacing the
//! right-most span first leaves every span to its left at its original offsets,
//! so no offset adjustment is ever needed.
//!
//! # Examples
//!
//! ```
//! use pii_fusion::anonymization::{AnonymizationEngine, Policy};
//! use pii_fusion::domain::{EntityCandidate, MergedEntity};
//!
//! # fn example() -> pii_fusion::domain::Result<()> {
//! let text = "Contact John at john@email.com";
//! let email: MergedEntity =
//!     EntityCandidate::from_text(text, "email", 16, 30, 0.8, "regex")?.into();
//!
//! let engine = AnonymizationEngine::new(Policy::Placeholder);
//! let result = engine.anonymize(text, vec![email])?;
//! assert_eq!(result.anonymized_text, "Contact John at [EMAIL_REDACTED]");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::Anonymizer,
    models::{AnonymizationResult, AnonymizationStats, AnonymizedEntity},
    policy::Policy,
};
use crate::domain::text::char_len;
use crate::domain::{MergedEntity, PiiError, Result};
use indexmap::IndexMap;

/// Main anonymization engine
///
/// Holds the strategy for one policy. The engine itself is stateless between
/// calls, so one instance can serve many texts, including from several threads.
pub struct AnonymizationEngine {
    policy: Policy,
    anonymizer: Box<dyn Anonymizer>,
}

impl AnonymizationEngine {
    /// Create an engine for `policy`
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            anonymizer: policy.anonymizer(),
        }
    }

    /// Create an engine from a free-form policy name
    ///
    /// Unrecognised names fall back to [`Policy::Placeholder`].
    pub fn from_policy_name(name: &str) -> Self {
        Self::new(Policy::from_name(name))
    }

    /// Policy applied by this engine
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Anonymize `text` given its merged entities
    ///
    /// # Behavior
    ///
    /// 1. Every entity is checked against the text before anything is rewritten
    /// 2. Substitutions are applied in descending `start` order
    /// 3. Entities whose substitution is `None` are recorded but left in place
    /// 4. The mapping records `value -> substitution`; a later-processed occurrence
    ///    of the same value overwrites the earlier entry
    ///
    /// # Errors
    ///
    /// Returns [`PiiError::InvalidSpan`] or [`PiiError::InvalidConfidence`] for an
    /// entity that does not fit `text`, and [`PiiError::Validation`] if two
    /// entities overlap (the input has not been through fusion).
    pub fn anonymize(&self, text: &str, entities: Vec<MergedEntity>) -> Result<AnonymizationResult> {
        if entities.is_empty() {
            return Ok(AnonymizationResult::unchanged(text, self.policy));
        }

        let mut entities = entities;
        entities.sort_by_key(|e| e.start);
        validate_entities(text, &entities)?;

        let mut buffer: Vec<char> = text.chars().collect();
        let mut values: Vec<Option<String>> = vec![None; entities.len()];
        let mut mapping = IndexMap::with_capacity(entities.len());

        for (idx, entity) in entities.iter().enumerate().rev() {
            let value = self.anonymizer.anonymize(entity);

            if let Some(ref replacement) = value {
                buffer.splice(entity.start..entity.end, replacement.chars());
            } else {
                tracing::debug!(
                    entity_type = %entity.entity_type,
                    start = entity.start,
                    end = entity.end,
                    policy = %self.policy,
                    "No replacement produced, span left unchanged"
                );
            }

            mapping.insert(entity.text.clone(), value.clone());
            values[idx] = value;
        }

        let stats = AnonymizationStats::from_entities(&entities);
        let entities: Vec<AnonymizedEntity> = entities
            .into_iter()
            .zip(values)
            .map(|(entity, anonymized_value)| AnonymizedEntity {
                entity,
                anonymized_value,
            })
            .collect();

        let result = AnonymizationResult {
            original_text: text.to_string(),
            anonymized_text: buffer.into_iter().collect(),
            entities,
            mapping,
            stats,
            policy: self.policy,
        };
        crate::log_anonymization_complete!(self.policy, result.total_entities(), result.replaced_count());

        Ok(result)
    }
}

impl Default for AnonymizationEngine {
    fn default() -> Self {
        Self::new(Policy::default())
    }
}

/// Anonymize `text` under the named policy
///
/// Convenience wrapper around [`AnonymizationEngine`]; unknown policy names fall
/// back to `placeholder`.
pub fn anonymize(text: &str, entities: Vec<MergedEntity>, policy: &str) -> Result<AnonymizationResult> {
    AnonymizationEngine::from_policy_name(policy).anonymize(text, entities)
}

/// `entities` must be sorted by `start`
fn validate_entities(text: &str, entities: &[MergedEntity]) -> Result<()> {
    let text_len = char_len(text);
    for entity in entities {
        entity.validate(text_len)?;
    }

    if let Some(pair) = entities.windows(2).find(|pair| pair[0].end > pair[1].start) {
        return Err(PiiError::Validation(format!(
            "Entities [{}, {}) and [{}, {}) overlap; merge candidates before anonymizing",
            pair[0].start, pair[0].end, pair[1].start, pair[1].end
        )));
    }

    Ok(())
}
