//! Adaptive (confidence-tiered) anonymization strategy
//!
//! | confidence        | replacement                                   |
//! |-------------------|-----------------------------------------------|
//! | `> 0.9`           | type-specific partial reveal, else hash tier  |
//! | `(0.7, 0.9]`      | `[TYPE_xxxxxx]` (6 hex chars of MD5)          |
//! | `<= 0.7`          | `[TYPE_POSSIBLE]`                             |

use super::hash::hashed_token;
use super::{type_label, Anonymizer};
use crate::anonymization::policy::Policy;
use crate::domain::text::{last_chars, take_chars};
use crate::domain::MergedEntity;

/// Confidence above which type-specific formats are used
pub const HIGH_CONFIDENCE: f64 = 0.9;
/// Confidence above which the short hash token is used
pub const MEDIUM_CONFIDENCE: f64 = 0.7;
/// Hex characters of the digest kept by the hash tier
pub const ADAPTIVE_HASH_LEN: usize = 6;

/// Adaptive strategy - replacement verbosity follows detection confidence
pub struct AdaptiveStrategy;

impl AdaptiveStrategy {
    /// Create a new adaptive strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for AdaptiveStrategy {
    fn anonymize(&self, entity: &MergedEntity) -> Option<String> {
        if entity.confidence > HIGH_CONFIDENCE {
            match entity.entity_type.as_str() {
                "email" | "email_address" => reveal_email(&entity.text),
                "phone" | "phone_number" => Some(format!("***-***-{}", last_chars(&entity.text, 4))),
                "person" | "person_name" => Some(reveal_initials(&entity.text)),
                "credit_card" => Some(format!("****-****-****-{}", last_chars(&entity.text, 4))),
                _ => Some(hashed_token(entity, ADAPTIVE_HASH_LEN)),
            }
        } else if entity.confidence > MEDIUM_CONFIDENCE {
            Some(hashed_token(entity, ADAPTIVE_HASH_LEN))
        } else {
            Some(format!("[{}_POSSIBLE]", type_label(entity)))
        }
    }

    fn policy(&self) -> Policy {
        Policy::Adaptive
    }
}

impl Default for AdaptiveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// `jo***@example.com`; `None` unless the value splits into exactly local@domain
fn reveal_email(value: &str) -> Option<String> {
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            Some(format!("{}***@{}", take_chars(local, 2), domain))
        }
        _ => None,
    }
}

/// `J*** S***` for multi-word names, `J***` otherwise
fn reveal_initials(value: &str) -> String {
    let words: Vec<&str> = value.split_whitespace().collect();
    match words.as_slice() {
        [first, .., last] => format!("{}*** {}***", take_chars(first, 1), take_chars(last, 1)),
        _ => format!("{}***", take_chars(value, 1)),
    }
}
