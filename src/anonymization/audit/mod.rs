//! Audit logging module
//!
//! Append-only record of anonymization runs. Values are stored as SHA-256
//! hashes only.

pub mod logger;

pub use logger::AuditLogger;
