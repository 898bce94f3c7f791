// PII Fusion - Multi-detector PII fusion and anonymization
// Copyright (c) 2025 PII Fusion Contributors
// Licensed under the MIT License

//! # PII Fusion - multi-detector PII detection and anonymization
//!
//! PII Fusion combines the findings of several independent PII detectors into
//! one consistent, non-overlapping set of entities and rewrites the source
//! text under a choice of anonymization policies.
//!
//! ## Overview
//!
//! Data flows one way:
//!
//! 1. **Detection**: each [`detector::Detector`] yields
//!    [`domain::EntityCandidate`]s for a text
//! 2. **Fusion**: [`fusion::merge`] folds overlapping candidates into
//!    [`domain::MergedEntity`]s, sorted and pairwise non-overlapping
//! 3. **Anonymization**: [`anonymization::AnonymizationEngine`] applies a
//!    [`anonymization::Policy`] to every merged entity
//! 4. **Reporting**: [`report`] renders the result as JSON, CSV or a summary
//!
//! All spans are half-open codepoint ranges into the analysed text.
//!
//! ## Architecture
//!
//! - [`domain`] - Entity types, errors and codepoint helpers
//! - [`detector`] - Detector trait, regex detector, external findings adapter
//! - [`fusion`] - Candidate validation and merging
//! - [`anonymization`] - Policies, engine and audit trail
//! - [`report`] - Export formats
//! - [`pipeline`] - End-to-end processing and line streams
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust
//! use pii_fusion::anonymization::Policy;
//! use pii_fusion::detector::{DetectorSet, RegexDetector};
//! use pii_fusion::pipeline::PiiPipeline;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let detectors = DetectorSet::new(vec![Arc::new(RegexDetector::new()?)]);
//! let pipeline = PiiPipeline::new(detectors, Policy::Placeholder);
//!
//! let processed = pipeline.anonymize_text("Contact John at john@email.com")?;
//! assert_eq!(processed.result.anonymized_text, "Contact John at [EMAIL_REDACTED]");
//! # Ok(())
//! # }
//! ```
//!
//! ## Fusion
//!
//! ```rust
//! use pii_fusion::domain::EntityCandidate;
//! use pii_fusion::fusion::merge;
//!
//! # fn main() -> pii_fusion::domain::Result<()> {
//! let text = "Contact John at john@email.com";
//! let merged = merge(vec![
//!     EntityCandidate::from_text(text, "person_name", 8, 12, 0.6, "regex")?,
//!     EntityCandidate::from_text(text, "person", 8, 12, 0.95, "ner")?,
//! ]);
//!
//! assert_eq!(merged.len(), 1);
//! assert_eq!(merged[0].entity_type, "person");
//! assert_eq!(merged[0].source, "regex+ner");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::Result`], carrying a [`domain::PiiError`].
//! Invalid spans are rejected before any text is rewritten:
//!
//! ```rust
//! use pii_fusion::domain::{EntityCandidate, PiiError};
//!
//! let err = EntityCandidate::from_text("short", "person", 2, 9, 0.9, "spacy").unwrap_err();
//! assert!(matches!(err, PiiError::InvalidSpan { .. }));
//! ```

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod detector;
pub mod domain;
pub mod fusion;
pub mod logging;
pub mod pipeline;
pub mod report;
