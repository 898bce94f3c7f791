//! End-to-end pipeline tests: detector output through fusion to export

use pii_fusion::anonymization::anonymizer::hash::md5_prefix;
use pii_fusion::anonymization::Policy;
use pii_fusion::config::{parse_config, PiiFusionConfig};
use pii_fusion::detector::{DetectorKind, FindingsDetector};
use pii_fusion::pipeline::{LineStream, PiiPipeline};
use pii_fusion::report::{export, ExportFormat};
use std::io::Cursor;
use tokio::sync::watch;

const TEXT: &str = "Contact John at john@email.com";

fn findings_file(dir: &tempfile::TempDir, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, json).unwrap();
    path
}

fn external_findings(dir: &tempfile::TempDir) -> Vec<FindingsDetector> {
    let presidio = findings_file(
        dir,
        "presidio.json",
        r#"[{"entity_type": "EMAIL_ADDRESS", "start": 16, "end": 30, "score": 1.0}]"#,
    );
    let spacy = findings_file(
        dir,
        "spacy.json",
        r#"[{"entity_type": "PERSON", "start": 8, "end": 12, "confidence": 0.85, "text": "John"}]"#,
    );

    vec![
        FindingsDetector::from_file(DetectorKind::Spacy, spacy).unwrap(),
        FindingsDetector::from_file(DetectorKind::Presidio, presidio).unwrap(),
    ]
}

fn config(policy: &str) -> PiiFusionConfig {
    let mut config = PiiFusionConfig::default();
    config.anonymization.policy = policy.to_string();
    config
}

#[test]
fn test_person_and_email_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = PiiPipeline::from_config(&config("adaptive"), external_findings(&dir)).unwrap();

    assert_eq!(
        pipeline.detectors().kinds(),
        vec![DetectorKind::Regex, DetectorKind::Presidio, DetectorKind::Spacy]
    );

    let processed = pipeline.anonymize_text(TEXT).unwrap();
    let result = &processed.result;

    assert_eq!(result.entities.len(), 2);
    let person = &result.entities[0].entity;
    assert_eq!((person.start, person.end), (8, 12));
    assert_eq!(person.source, "spacy");

    let email = &result.entities[1].entity;
    assert_eq!((email.start, email.end), (16, 30));
    assert_eq!(email.entity_type, "email_address");
    assert_eq!(email.source, "regex+presidio");
    assert_eq!(email.confidence, 1.0);

    let person_token = format!("[PERSON_{}]", md5_prefix("John", 6));
    assert_eq!(
        result.anonymized_text,
        format!("Contact {person_token} at jo***@email.com")
    );
    assert_eq!(processed.metrics.entities_found, 2);
}

#[test]
fn test_hash_policy_from_config() {
    let pipeline = PiiPipeline::from_config(&config("hash"), Vec::new()).unwrap();
    assert_eq!(pipeline.policy(), Policy::Hash);

    let result = pipeline.anonymize_text(TEXT).unwrap().result;
    assert_eq!(
        result.anonymized_text,
        format!("Contact John at [EMAIL_{}]", md5_prefix("john@email.com", 8))
    );
}

#[test]
fn test_regex_only_ignores_external_findings() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config("placeholder");
    config.detectors.enabled = vec![DetectorKind::Regex];

    let pipeline = PiiPipeline::from_config(&config, external_findings(&dir)).unwrap();
    let result = pipeline.anonymize_text(TEXT).unwrap().result;

    assert_eq!(result.anonymized_text, "Contact John at [EMAIL_REDACTED]");
    assert_eq!(result.entities[0].entity.source, "regex");
}

#[test]
fn test_min_confidence_filters_regex_patterns() {
    let mut config = config("placeholder");
    config.detectors.min_confidence = 0.95;

    let pipeline = PiiPipeline::from_config(&config, Vec::new()).unwrap();
    let result = pipeline.anonymize_text(TEXT).unwrap().result;

    assert_eq!(result.anonymized_text, TEXT);
    assert!(!result.has_entities());
}

#[test]
fn test_custom_pattern_library() {
    let dir = tempfile::tempdir().unwrap();
    let library = findings_file(
        &dir,
        "patterns.toml",
        r#"
[[patterns]]
name = "mrn"
entity_type = "medical_record"
regex = 'MRN-\d{6}'
confidence = 0.95
"#,
    );

    let parsed = parse_config(&format!(
        "[detectors]\nenabled = [\"regex\"]\npattern_library = {:?}\n\n[anonymization]\npolicy = \"mask\"\n",
        library.to_string_lossy()
    ))
    .unwrap();

    let pipeline = PiiPipeline::from_config(&parsed, Vec::new()).unwrap();
    let result = pipeline.anonymize_text("Chart MRN-123456, mail a@b.io").unwrap().result;

    // Only the custom library is loaded
    assert_eq!(result.anonymized_text, "Chart MR******56, mail a@b.io");
}

#[test]
fn test_invalid_external_span_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let presidio = findings_file(
        &dir,
        "presidio.json",
        r#"[{"entity_type": "EMAIL_ADDRESS", "start": 17, "end": 31, "score": 1.0}]"#,
    );
    let findings = vec![FindingsDetector::from_file(DetectorKind::Presidio, presidio).unwrap()];

    let pipeline = PiiPipeline::from_config(&config("hash"), findings).unwrap();
    let err = pipeline.anonymize_text(TEXT).unwrap_err();
    assert!(err.is_validation_failure());
}

#[tokio::test]
async fn test_concurrent_detection_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let sequential = PiiPipeline::from_config(&config("adaptive"), external_findings(&dir))
        .unwrap()
        .with_concurrent_detection(false);
    let concurrent = PiiPipeline::from_config(&config("adaptive"), external_findings(&dir))
        .unwrap()
        .with_concurrent_detection(true);

    let a = sequential.anonymize_text_async(TEXT).await.unwrap();
    let b = concurrent.anonymize_text_async(TEXT).await.unwrap();

    assert_eq!(a.result.anonymized_text, b.result.anonymized_text);
    assert_eq!(a.result.entities, b.result.entities);
    assert_eq!(
        concurrent.detect_async(TEXT).await.unwrap(),
        sequential.detect(TEXT).unwrap()
    );
}

#[test]
fn test_audit_enabled_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config("placeholder");
    config.audit.enabled = true;
    config.audit.log_path = dir.path().join("audit").join("runs.log");

    let pipeline = PiiPipeline::from_config(&config, Vec::new()).unwrap();
    pipeline.anonymize_text(TEXT).unwrap();
    pipeline.anonymize_text("no pii").unwrap();

    let log = std::fs::read_to_string(&config.audit.log_path).unwrap();
    let records: Vec<serde_json::Value> = log
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["policy"], "placeholder");
    assert_eq!(records[0]["entities_count"], 1);
    assert_eq!(records[1]["entities_count"], 0);
    assert!(!log.contains("john@email.com"));
}

#[test]
fn test_line_stream_end_to_end() {
    let (_tx, rx) = watch::channel(false);
    let pipeline = PiiPipeline::from_config(&config("placeholder"), Vec::new()).unwrap();
    let input = Cursor::new("  call 555-123-4567  \n\nssn 123-45-6789\n");

    let mut outputs = Vec::new();
    let count = pipeline
        .process_lines(LineStream::new(input, rx), |processed| {
            outputs.push(export(&processed.result, ExportFormat::Text)?);
            Ok(())
        })
        .unwrap();

    assert_eq!(count, 2);
    assert_eq!(outputs, vec!["call [PHONE_REDACTED]", "ssn [SSN_REDACTED]"]);
}

#[test]
fn test_line_stream_stops_when_signalled() {
    let (tx, rx) = watch::channel(false);
    let pipeline = PiiPipeline::from_config(&config("placeholder"), Vec::new()).unwrap();
    let input = Cursor::new("a@b.io\nc@d.io\ne@f.io\n");

    let mut seen = 0;
    let count = pipeline
        .process_lines(LineStream::new(input, rx), |_| {
            seen += 1;
            if seen == 2 {
                let _ = tx.send(true);
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(count, 2);
}
