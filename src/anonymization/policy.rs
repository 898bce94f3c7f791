//! Anonymization policies

use super::anonymizer::{
    adaptive::AdaptiveStrategy, hash::HashStrategy, mask::MaskStrategy,
    placeholder::PlaceholderStrategy, Anonymizer,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named anonymization strategy selecting how an entity's text is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// `[TYPE_REDACTED]`
    Placeholder,
    /// `[TYPE_<8 hex chars of md5>]`
    Hash,
    /// Keep the first and last two characters, star out the rest
    Mask,
    /// Confidence-tiered replacement
    #[default]
    Adaptive,
}

impl Policy {
    /// All policies, in documentation order
    pub const ALL: [Policy; 4] = [
        Policy::Placeholder,
        Policy::Hash,
        Policy::Mask,
        Policy::Adaptive,
    ];

    /// Strict parse; `None` for unrecognised names
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "placeholder" => Some(Self::Placeholder),
            "hash" => Some(Self::Hash),
            "mask" => Some(Self::Mask),
            "adaptive" => Some(Self::Adaptive),
            _ => None,
        }
    }

    /// Lenient parse: unrecognised names fall back to [`Policy::Placeholder`]
    ///
    /// Callers may pass free-form strings, so this never fails.
    ///
    /// ```
    /// use pii_fusion::anonymization::Policy;
    ///
    /// assert_eq!(Policy::from_name("HASH"), Policy::Hash);
    /// assert_eq!(Policy::from_name("partial"), Policy::Placeholder);
    /// ```
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(
                policy = %name,
                fallback = %Self::Placeholder,
                "Unknown anonymization policy, using fallback"
            );
            Self::Placeholder
        })
    }

    /// Policy name as used in configuration and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Placeholder => "placeholder",
            Self::Hash => "hash",
            Self::Mask => "mask",
            Self::Adaptive => "adaptive",
        }
    }

    /// Build the anonymizer implementing this policy
    pub fn anonymizer(&self) -> Box<dyn Anonymizer> {
        match self {
            Self::Placeholder => Box::new(PlaceholderStrategy::new()),
            Self::Hash => Box::new(HashStrategy::new()),
            Self::Mask => Box::new(MaskStrategy::new()),
            Self::Adaptive => Box::new(AdaptiveStrategy::new()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_policies() {
        for policy in Policy::ALL {
            assert_eq!(Policy::parse(policy.as_str()), Some(policy));
        }
    }

    #[test]
    fn test_from_name_falls_back_to_placeholder() {
        assert_eq!(Policy::from_name("partial"), Policy::Placeholder);
        assert_eq!(Policy::from_name(""), Policy::Placeholder);
        assert_eq!(Policy::from_name(" Mask "), Policy::Mask);
    }

    #[test]
    fn test_default_is_adaptive() {
        assert_eq!(Policy::default(), Policy::Adaptive);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Policy::Placeholder).unwrap();
        assert_eq!(json, "\"placeholder\"");
        let policy: Policy = serde_json::from_str("\"adaptive\"").unwrap();
        assert_eq!(policy, Policy::Adaptive);
    }
}
