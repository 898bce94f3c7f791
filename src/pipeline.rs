//! End-to-end processing of texts
//!
//! [`PiiPipeline`] wires detection, fusion and anonymization together for one
//! text at a time, timing each stage and optionally writing an audit record.
//! [`LineStream`] feeds it line by line until input ends or a stop signal is
//! raised.

use crate::anonymization::audit::AuditLogger;
use crate::anonymization::{AnonymizationEngine, AnonymizationResult, Policy};
use crate::config::PiiFusionConfig;
use crate::detector::{DetectorSet, FindingsDetector};
use crate::domain::{EntityCandidate, MergedEntity, PiiError, Result};
use crate::fusion::fuse_candidates;
use serde::Serialize;
use std::io::{BufRead, Lines};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Wall-clock timings of one run, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunMetrics {
    pub total_time: f64,
    pub detection_time: f64,
    pub anonymization_time: f64,
    pub entities_found: usize,
}

impl RunMetrics {
    fn new(detection: Duration, anonymization: Duration, entities_found: usize) -> Self {
        Self {
            total_time: (detection + anonymization).as_secs_f64(),
            detection_time: detection.as_secs_f64(),
            anonymization_time: anonymization.as_secs_f64(),
            entities_found,
        }
    }
}

/// Anonymization result with its run metrics
#[derive(Debug, Clone)]
pub struct ProcessedText {
    pub result: AnonymizationResult,
    pub metrics: RunMetrics,
}

/// Short JSON form: no original text, no mapping
#[derive(Debug, Serialize)]
pub struct CompactRecord<'a> {
    pub anonymized_text: &'a str,
    pub entities_found: usize,
    /// Policy name as requested, before any fallback
    pub strategy: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<&'a RunMetrics>,
}

impl ProcessedText {
    pub fn compact_record<'a>(&'a self, strategy: &'a str, with_metrics: bool) -> CompactRecord<'a> {
        CompactRecord {
            anonymized_text: &self.result.anonymized_text,
            entities_found: self.result.total_entities(),
            strategy,
            metrics: with_metrics.then_some(&self.metrics),
        }
    }

    /// [`CompactRecord`] as two-space indented JSON
    pub fn to_compact_json(&self, strategy: &str, with_metrics: bool) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.compact_record(strategy, with_metrics))?)
    }
}

/// Detection, fusion and anonymization for one policy
pub struct PiiPipeline {
    detectors: DetectorSet,
    engine: AnonymizationEngine,
    concurrent: bool,
    audit: Option<AuditLogger>,
}

impl PiiPipeline {
    pub fn new(detectors: DetectorSet, policy: Policy) -> Self {
        Self {
            detectors,
            engine: AnonymizationEngine::new(policy),
            concurrent: false,
            audit: None,
        }
    }

    /// Build a pipeline from configuration and the findings available for
    /// external detectors
    pub fn from_config(
        config: &PiiFusionConfig,
        findings: Vec<FindingsDetector>,
    ) -> anyhow::Result<Self> {
        let detectors = DetectorSet::from_config(&config.detectors, findings)?;
        let mut pipeline = Self::new(detectors, config.anonymization.policy())
            .with_concurrent_detection(config.detectors.concurrent);

        if config.audit.enabled {
            pipeline = pipeline.with_audit(AuditLogger::new(
                &config.audit.log_path,
                config.audit.json_format,
            )?);
        }

        Ok(pipeline)
    }

    /// Run detectors on worker threads in the async entry points
    pub fn with_concurrent_detection(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Record every anonymized text in `audit`
    pub fn with_audit(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn policy(&self) -> Policy {
        self.engine.policy()
    }

    pub fn detectors(&self) -> &DetectorSet {
        &self.detectors
    }

    /// Detect and fuse entities in `text`, running detectors sequentially
    pub fn detect(&self, text: &str) -> Result<Vec<MergedEntity>> {
        let candidates = self.detectors.detect(text)?;
        fuse_candidates(text, candidates)
    }

    /// Detect and fuse entities in `text`
    pub async fn detect_async(&self, text: &str) -> Result<Vec<MergedEntity>> {
        let candidates = self.candidates_async(text).await?;
        fuse_candidates(text, candidates)
    }

    /// Detect, fuse and anonymize `text`
    pub fn anonymize_text(&self, text: &str) -> Result<ProcessedText> {
        let started = Instant::now();
        let candidates = self.detectors.detect(text)?;
        self.finish(text, candidates, started)
    }

    /// Detect, fuse and anonymize `text`, with concurrent detection if enabled
    pub async fn anonymize_text_async(&self, text: &str) -> Result<ProcessedText> {
        let started = Instant::now();
        let candidates = self.candidates_async(text).await?;
        self.finish(text, candidates, started)
    }

    /// Anonymize each line independently, handing results to `on_result`
    ///
    /// Stops at end of input, on the stop signal, or on the first error.
    /// Returns the number of lines processed.
    pub fn process_lines<R, F>(&self, lines: LineStream<R>, mut on_result: F) -> Result<usize>
    where
        R: BufRead,
        F: FnMut(ProcessedText) -> Result<()>,
    {
        let mut processed = 0;
        for line in lines {
            let line = line?;
            on_result(self.anonymize_text(line.trim())?)?;
            processed += 1;
        }

        tracing::debug!(lines = processed, "Line processing finished");
        Ok(processed)
    }

    async fn candidates_async(&self, text: &str) -> Result<Vec<EntityCandidate>> {
        if self.concurrent {
            self.detectors.detect_concurrent(text).await
        } else {
            self.detectors.detect(text)
        }
    }

    fn finish(
        &self,
        text: &str,
        candidates: Vec<EntityCandidate>,
        started: Instant,
    ) -> Result<ProcessedText> {
        let merged = fuse_candidates(text, candidates)?;
        let detection_time = started.elapsed();

        let anonymize_started = Instant::now();
        let result = self.engine.anonymize(text, merged)?;
        let anonymization_time = anonymize_started.elapsed();

        if let Some(ref audit) = self.audit {
            audit
                .log_anonymization(&result)
                .map_err(|e| PiiError::Io(format!("Failed to write audit record: {e:#}")))?;
        }

        let metrics = RunMetrics::new(detection_time, anonymization_time, result.total_entities());
        Ok(ProcessedText { result, metrics })
    }
}

/// Non-blank lines of a reader, until input ends or a stop is signalled
///
/// The signal is checked before each line is read, so a line already being
/// read is still returned.
pub struct LineStream<R> {
    lines: Lines<R>,
    stop: watch::Receiver<bool>,
}

impl<R: BufRead> LineStream<R> {
    pub fn new(reader: R, stop: watch::Receiver<bool>) -> Self {
        Self {
            lines: reader.lines(),
            stop,
        }
    }
}

impl<R: BufRead> Iterator for LineStream<R> {
    type Item = std::io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if *self.stop.borrow() {
                return None;
            }

            match self.lines.next()? {
                Ok(line) if line.trim().is_empty() => continue,
                other => return Some(other),
            }
        }
    }
}
