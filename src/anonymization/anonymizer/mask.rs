//! Mask anonymization strategy

use super::Anonymizer;
use crate::anonymization::policy::Policy;
use crate::domain::text::{char_len, last_chars, take_chars};
use crate::domain::MergedEntity;

const MASK_CHAR: char = '*';
const KEEP_EACH_SIDE: usize = 2;

/// Mask strategy - keeps two characters on each side and stars out the middle
///
/// Values of four characters or fewer are masked completely. The output always
/// has the same number of codepoints as the input.
pub struct MaskStrategy;

impl MaskStrategy {
    /// Create a new mask strategy
    pub fn new() -> Self {
        Self
    }
}

impl Anonymizer for MaskStrategy {
    fn anonymize(&self, entity: &MergedEntity) -> Option<String> {
        Some(mask_value(&entity.text))
    }

    fn policy(&self) -> Policy {
        Policy::Mask
    }
}

impl Default for MaskStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// Mask a value, preserving its codepoint length
pub fn mask_value(value: &str) -> String {
    let len = char_len(value);
    if len <= KEEP_EACH_SIDE * 2 {
        return MASK_CHAR.to_string().repeat(len);
    }

    let mut masked = String::with_capacity(value.len());
    masked.push_str(take_chars(value, KEEP_EACH_SIDE));
    masked.extend(std::iter::repeat(MASK_CHAR).take(len - KEEP_EACH_SIDE * 2));
    masked.push_str(last_chars(value, KEEP_EACH_SIDE));
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::test_entity;
    use test_case::test_case;

    #[test_case("john@email.com", "jo**********om" ; "email")]
    #[test_case("12345", "12*45" ; "five chars")]
    #[test_case("1234", "****" ; "four chars")]
    #[test_case("ab", "**" ; "two chars")]
    #[test_case("Zoë Müller", "Zo******er" ; "multibyte")]
    fn test_mask_value(input: &str, expected: &str) {
        assert_eq!(mask_value(input), expected);
        assert_eq!(char_len(&mask_value(input)), char_len(input));
    }

    #[test]
    fn test_mask_strategy() {
        let strategy = MaskStrategy::new();
        let entity = test_entity("phone", "555-123-4567", 0.8);
        assert_eq!(strategy.anonymize(&entity).as_deref(), Some("55********67"));
    }
}
