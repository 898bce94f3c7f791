//! PII detection module
//!
//! Provides the [`Detector`] trait and the adapters producing
//! [`EntityCandidate`]s for fusion:
//!
//! - [`RegexDetector`]: in-process pattern matching over an ordered library
//! - [`FindingsDetector`]: replays findings computed by external engines
//!
//! A [`DetectorSet`] runs its detectors in priority order (regex, presidio,
//! spacy), sequentially or on blocking worker threads, and concatenates their
//! output in that same order so fusion tie-breaking stays deterministic.

pub mod findings;
pub mod patterns;
pub mod regex;

pub use findings::{Finding, FindingsDetector};
pub use patterns::PatternRegistry;
pub use regex::RegexDetector;

use crate::config::DetectorsConfig;
use crate::domain::{EntityCandidate, PiiError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Trait for PII detection implementations
pub trait Detector: Send + Sync {
    /// Which detector this is
    fn kind(&self) -> DetectorKind;

    /// Detect PII candidates in `text`
    fn detect(&self, text: &str) -> Result<Vec<EntityCandidate>>;
}

/// Known detectors, declared in execution priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Pattern matching
    Regex,
    /// Microsoft Presidio analyzer
    Presidio,
    /// spaCy named entity recognition
    Spacy,
}

impl DetectorKind {
    /// All detectors, in priority order
    pub const ALL: [DetectorKind; 3] = [
        DetectorKind::Regex,
        DetectorKind::Presidio,
        DetectorKind::Spacy,
    ];

    /// Tag written to [`EntityCandidate::source`]
    pub fn source_tag(&self) -> &'static str {
        match self {
            Self::Regex => "regex",
            Self::Presidio => "presidio",
            Self::Spacy => "spacy",
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source_tag())
    }
}

impl FromStr for DetectorKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regex" => Ok(Self::Regex),
            "presidio" => Ok(Self::Presidio),
            "spacy" => Ok(Self::Spacy),
            other => Err(format!(
                "Unknown detector '{other}'. Must be one of: regex, presidio, spacy"
            )),
        }
    }
}

/// Detectors to run on each text, kept in priority order
#[derive(Clone, Default)]
pub struct DetectorSet {
    detectors: Vec<Arc<dyn Detector>>,
    unavailable: Vec<DetectorKind>,
}

impl DetectorSet {
    /// Create a set; detectors are stably reordered by priority
    pub fn new(mut detectors: Vec<Arc<dyn Detector>>) -> Self {
        detectors.sort_by_key(|d| d.kind());
        Self {
            detectors,
            unavailable: Vec::new(),
        }
    }

    /// Build the set described by `config`
    ///
    /// The regex detector is built in-process. Presidio and spaCy need findings
    /// supplied by the caller; an enabled detector without findings is skipped
    /// and reported by [`DetectorSet::unavailable`].
    pub fn from_config(
        config: &DetectorsConfig,
        findings: Vec<FindingsDetector>,
    ) -> anyhow::Result<Self> {
        let mut detectors: Vec<Arc<dyn Detector>> = Vec::new();
        let mut findings = findings;
        let mut unavailable = Vec::new();

        for kind in DetectorKind::ALL {
            let provided: Vec<FindingsDetector> = {
                let (matching, rest) = findings.into_iter().partition(|f| f.kind() == kind);
                findings = rest;
                matching
            };

            if !config.enabled.contains(&kind) {
                if !provided.is_empty() {
                    tracing::debug!(detector = %kind, "Findings supplied for a disabled detector, ignoring");
                }
                continue;
            }

            match kind {
                DetectorKind::Regex => {
                    let registry = match config.pattern_library {
                        Some(ref path) => PatternRegistry::from_file(path)?,
                        None => PatternRegistry::default_patterns()
                            .context("Failed to load built-in pattern library")?,
                    };
                    detectors.push(Arc::new(
                        RegexDetector::with_registry(registry)
                            .with_min_confidence(config.min_confidence),
                    ));
                }
                DetectorKind::Presidio | DetectorKind::Spacy => {
                    if provided.is_empty() {
                        tracing::debug!(detector = %kind, "Detector not available, skipping");
                        unavailable.push(kind);
                    }
                    for detector in provided {
                        detectors.push(Arc::new(detector));
                    }
                }
            }
        }

        Ok(Self {
            unavailable,
            ..Self::new(detectors)
        })
    }

    /// Enabled detectors that were skipped for lack of findings
    pub fn unavailable(&self) -> &[DetectorKind] {
        &self.unavailable
    }

    /// Kinds of the detectors in this set, in execution order
    pub fn kinds(&self) -> Vec<DetectorKind> {
        self.detectors.iter().map(|d| d.kind()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }

    /// Run every detector in priority order on the current thread
    pub fn detect(&self, text: &str) -> Result<Vec<EntityCandidate>> {
        let mut candidates = Vec::new();
        for detector in &self.detectors {
            candidates.extend(detector.detect(text)?);
        }
        Ok(candidates)
    }

    /// Run every detector on a blocking worker thread, concurrently
    ///
    /// Output is concatenated in priority order regardless of which detector
    /// finishes first.
    pub async fn detect_concurrent(&self, text: &str) -> Result<Vec<EntityCandidate>> {
        let handles: Vec<_> = self
            .detectors
            .iter()
            .map(|detector| {
                let detector = Arc::clone(detector);
                let text = text.to_string();
                tokio::task::spawn_blocking(move || detector.detect(&text))
            })
            .collect();

        let results = futures::future::join_all(handles).await;

        let mut candidates = Vec::new();
        for (detector, result) in self.detectors.iter().zip(results) {
            let found = result
                .map_err(|e| PiiError::detector(detector.kind().source_tag(), e.to_string()))??;
            candidates.extend(found);
        }
        Ok(candidates)
    }
}

impl fmt::Debug for DetectorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorSet")
            .field("detectors", &self.kinds())
            .finish()
    }
}
