//! Anonymization module
//!
//! Rewrites a text given its fused entities under one of several policies.
//!
//! # Architecture
//!
//! - **Policy**: named strategy ([`Policy`]), parsed leniently from free-form names
//! - **Anonymizer**: pure per-entity substitution ([`anonymizer::Anonymizer`])
//! - **Engine**: descending-order, offset-safe application on one text buffer
//! - **Audit**: append-only trail with hashed values, never plaintext
//!
//! # Usage
//!
//! ```rust
//! use pii_fusion::anonymization::anonymize;
//! use pii_fusion::domain::{EntityCandidate, MergedEntity};
//!
//! # fn example() -> pii_fusion::domain::Result<()> {
//! let text = "Card 4532 1234 5678 9012 on file";
//! let card: MergedEntity =
//!     EntityCandidate::from_text(text, "credit_card", 5, 24, 0.99, "presidio")?.into();
//!
//! let result = anonymize(text, vec![card], "adaptive")?;
//! assert_eq!(result.anonymized_text, "Card ****-****-****-9012 on file");
//! # Ok(())
//! # }
//! ```

pub mod anonymizer;
pub mod audit;
pub mod engine;
pub mod models;
pub mod policy;

// Re-export main types
pub use engine::{anonymize, AnonymizationEngine};
pub use models::{AnonymizationResult, AnonymizationStats, AnonymizedEntity};
pub use policy::Policy;
