//! Domain models and types for PII Fusion.
//!
//! The domain layer provides:
//! - **Entity models** ([`EntityCandidate`], [`MergedEntity`])
//! - **Codepoint offset helpers** ([`text`])
//! - **Error types** ([`PiiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Spans
//!
//! Every span is a half-open `[start, end)` range measured in codepoints of the
//! analysed text. Candidates are always constructed from the exact slice they
//! annotate:
//!
//! ```rust
//! use pii_fusion::domain::EntityCandidate;
//!
//! # fn example() -> pii_fusion::domain::Result<()> {
//! let text = "Call José on 555-123-4567";
//! let candidate = EntityCandidate::from_text(text, "person", 5, 9, 0.9, "spacy")?;
//! assert_eq!(candidate.text, "José");
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod errors;
pub mod result;
pub mod text;

pub use entity::{EntityCandidate, MergedEntity, SOURCE_SEPARATOR};
pub use errors::PiiError;
pub use result::Result;
