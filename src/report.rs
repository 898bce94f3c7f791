//! Reporting and export for anonymization results
//!
//! Pure transformations of an [`AnonymizationResult`] into a structured JSON
//! record, CSV rows, a fixed-format summary, or the bare anonymized text.

use crate::anonymization::{AnonymizationResult, AnonymizationStats, AnonymizedEntity};
use crate::domain::{PiiError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CSV header row
pub const CSV_HEADER: [&str; 7] = [
    "Entity Type",
    "Original Text",
    "Start",
    "End",
    "Confidence",
    "Source",
    "Anonymized",
];

/// Output format for an anonymization result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Anonymized text only
    #[default]
    Text,
    /// Structured record with every field
    Json,
    /// One row per entity
    Csv,
    /// Human-readable statistics block
    Summary,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Text,
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Summary,
    ];

    /// Strict parse; `None` for unrecognised names
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "summary" => Some(Self::Summary),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Lenient parse: unrecognised names fall back to [`ExportFormat::Text`]
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(format = %name, "Unknown export format, using text");
            Self::Text
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Summary => "summary",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured export record
///
/// Borrowed view over a result; the policy is not part of the record.
#[derive(Debug, Serialize)]
pub struct ExportRecord<'a> {
    pub original_text: &'a str,
    pub anonymized_text: &'a str,
    pub entities: &'a [AnonymizedEntity],
    pub mapping: &'a IndexMap<String, Option<String>>,
    pub stats: &'a AnonymizationStats,
}

impl<'a> From<&'a AnonymizationResult> for ExportRecord<'a> {
    fn from(result: &'a AnonymizationResult) -> Self {
        Self {
            original_text: &result.original_text,
            anonymized_text: &result.anonymized_text,
            entities: &result.entities,
            mapping: &result.mapping,
            stats: &result.stats,
        }
    }
}

/// One CSV row
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRow {
    pub entity_type: String,
    pub original_text: String,
    pub start: usize,
    pub end: usize,
    pub confidence: f64,
    pub source: String,
    pub anonymized: Option<String>,
}

impl TabularRow {
    /// Row cells in header order; a missing replacement is an empty cell
    pub fn cells(&self) -> [String; 7] {
        [
            self.entity_type.clone(),
            self.original_text.clone(),
            self.start.to_string(),
            self.end.to_string(),
            format_confidence(self.confidence),
            self.source.clone(),
            self.anonymized.clone().unwrap_or_default(),
        ]
    }
}

impl From<&AnonymizedEntity> for TabularRow {
    fn from(entity: &AnonymizedEntity) -> Self {
        Self {
            entity_type: entity.entity.entity_type.clone(),
            original_text: entity.entity.text.clone(),
            start: entity.entity.start,
            end: entity.entity.end,
            confidence: entity.entity.confidence,
            source: entity.entity.source.clone(),
            anonymized: entity.anonymized_value.clone(),
        }
    }
}

/// Rows for every entity, in ascending `start` order
pub fn tabular_rows(result: &AnonymizationResult) -> Vec<TabularRow> {
    result.entities.iter().map(TabularRow::from).collect()
}

/// Structured record as two-space indented JSON
pub fn to_json(result: &AnonymizationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ExportRecord::from(result))?)
}

/// Header plus one CRLF-terminated row per entity
pub fn to_csv(result: &AnonymizationResult) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in tabular_rows(result) {
        writer.write_record(row.cells())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PiiError::Export(format!("Failed to flush CSV output: {e}")))?;
    String::from_utf8(bytes).map_err(|e| PiiError::Export(format!("CSV output is not UTF-8: {e}")))
}

/// Fixed-format summary block, without a trailing newline
pub fn to_summary(result: &AnonymizationResult) -> String {
    let stats = &result.stats;
    let types: Vec<&str> = stats.entity_types.keys().map(String::as_str).collect();
    let sources: Vec<&str> = stats.sources.keys().map(String::as_str).collect();

    [
        "PII Detection Summary".to_string(),
        "=".repeat(20),
        format!("Total entities found: {}", stats.total_entities),
        format!("Entity types: {}", types.join(", ")),
        format!("Detection sources: {}", sources.join(", ")),
        String::new(),
        "Confidence distribution:".to_string(),
        format!("  High (>0.8): {}", stats.confidence_distribution.high),
        format!("  Medium (0.6-0.8): {}", stats.confidence_distribution.medium),
        format!("  Low (<0.6): {}", stats.confidence_distribution.low),
    ]
    .join("\n")
}

/// Render `result` in `format`
pub fn export(result: &AnonymizationResult, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(result),
        ExportFormat::Csv => to_csv(result),
        ExportFormat::Summary => Ok(to_summary(result)),
        ExportFormat::Text => Ok(result.anonymized_text.clone()),
    }
}

/// Shortest round-trip form with Python-style exponents
///
/// Whole numbers keep a trailing `.0`. Magnitudes below `1e-4` or from `1e16`
/// up switch to exponent notation with a signed, two-digit exponent (`1e-05`).
fn format_confidence(confidence: f64) -> String {
    let magnitude = confidence.abs();
    if confidence != 0.0 && confidence.is_finite() && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{confidence:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }

    if confidence.fract() == 0.0 {
        format!("{confidence:.1}")
    } else {
        confidence.to_string()
    }
}
