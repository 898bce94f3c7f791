//! Hash anonymization strategy

use super::{type_label, Anonymizer};
use crate::anonymization::policy::Policy;
use crate::domain::MergedEntity;

/// Hex characters of the digest kept by the hash policy
pub const HASH_PREFIX_LEN: usize = 8;

/// Hash strategy - replaces PII with `[TYPE_xxxxxxxx]` built from the MD5 of the value
///
/// The token is deterministic: the same value always maps to the same token,
/// which keeps references consistent across a document.
pub struct HashStrategy {
    prefix_len: usize,
}

impl HashStrategy {
    /// Create a new hash strategy
    pub fn new() -> Self {
        Self {
            prefix_len: HASH_PREFIX_LEN,
        }
    }
}

impl Anonymizer for HashStrategy {
    fn anonymize(&self, entity: &MergedEntity) -> Option<String> {
        Some(hashed_token(entity, self.prefix_len))
    }

    fn policy(&self) -> Policy {
        Policy::Hash
    }
}

impl Default for HashStrategy {
    fn default() -> Self {
        Self::new()
    }
}

/// First `len` lowercase hex characters of the MD5 digest of `value`
pub fn md5_prefix(value: &str, len: usize) -> String {
    let digest = format!("{:x}", md5::compute(value.as_bytes()));
    digest[..len.min(digest.len())].to_string()
}

/// `[TYPE_<prefix>]` token for an entity
pub(crate) fn hashed_token(entity: &MergedEntity, prefix_len: usize) -> String {
    format!(
        "[{}_{}]",
        type_label(entity),
        md5_prefix(&entity.text, prefix_len)
    )
}
