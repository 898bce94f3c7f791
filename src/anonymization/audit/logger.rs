//! Audit logger for anonymization runs

use crate::anonymization::models::{AnonymizationResult, AnonymizedEntity};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    run_id: String,
    timestamp: String,
    policy: String,
    text_hash: String,
    entities_count: usize,
    replaced_count: usize,
    entities: Vec<AuditEntity>,
}

/// Audit entity entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditEntity {
    entity_type: String,
    source: String,
    start: usize,
    end: usize,
    confidence: f64,
    /// SHA-256 hash of the original value (never log plaintext PII)
    value_hash: String,
    replaced: bool,
}

/// Audit logger for anonymization runs
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger, creating the parent directory if needed
    pub fn new(log_path: impl Into<PathBuf>, json_format: bool) -> Result<Self> {
        let log_path = log_path.into();
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    /// Path of the audit log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one record for an anonymization run; returns the run id
    pub fn log_anonymization(&self, result: &AnonymizationResult) -> Result<Uuid> {
        let run_id = Uuid::new_v4();
        let entry = AuditLogEntry {
            run_id: run_id.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            policy: result.policy.to_string(),
            text_hash: hash_value(&result.original_text),
            entities_count: result.total_entities(),
            replaced_count: result.replaced_count(),
            entities: result.entities.iter().map(audit_entity).collect(),
        };

        self.write_entry(&entry)?;
        tracing::debug!(run_id = %run_id, path = %self.log_path.display(), "Audit record written");
        Ok(run_id)
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Run: {} | Policy: {} | Entities: {} | Replaced: {}",
                entry.timestamp,
                entry.run_id,
                entry.policy,
                entry.entities_count,
                entry.replaced_count
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}

fn audit_entity(entity: &AnonymizedEntity) -> AuditEntity {
    AuditEntity {
        entity_type: entity.entity.entity_type.clone(),
        source: entity.entity.source.clone(),
        start: entity.entity.start,
        end: entity.entity.end,
        confidence: entity.entity.confidence,
        value_hash: hash_value(&entity.entity.text),
        replaced: entity.is_replaced(),
    }
}

/// Hash a value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}
