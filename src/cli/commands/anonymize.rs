//! Anonymize command implementation
//!
//! Reads text from a file or stdin, runs detection, fusion and anonymization,
//! and writes the result in the requested format. The default output is the
//! anonymized text alone.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_PROCESSING_ERROR, EXIT_SUCCESS};
use crate::config::{load_or_default, PiiFusionConfig};
use crate::detector::{DetectorKind, FindingsDetector};
use crate::domain::{PiiError, Result};
use crate::pipeline::{LineStream, PiiPipeline, ProcessedText};
use crate::report::{export, ExportFormat};
use clap::Args;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Findings file for an external detector, given as `KIND=PATH`
#[derive(Debug, Clone, PartialEq)]
pub struct FindingsSource {
    pub kind: DetectorKind,
    pub path: PathBuf,
}

impl FromStr for FindingsSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (kind, path) = s
            .split_once('=')
            .ok_or_else(|| format!("expected KIND=PATH, got '{s}'"))?;
        let kind: DetectorKind = kind.parse()?;
        if kind == DetectorKind::Regex {
            return Err("the regex detector runs in-process and takes no findings".to_string());
        }
        if path.trim().is_empty() {
            return Err(format!("missing path for {kind} findings"));
        }

        Ok(Self {
            kind,
            path: PathBuf::from(path.trim()),
        })
    }
}

/// Arguments for the anonymize command
#[derive(Args, Debug, Default)]
pub struct AnonymizeArgs {
    /// Input file (default: stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Anonymization policy: placeholder, hash, mask, adaptive (unknown names use placeholder)
    #[arg(short = 's', long, visible_alias = "strategy")]
    pub policy: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Print {anonymized_text, entities_found, strategy} as JSON
    #[arg(short, long, conflicts_with = "format")]
    pub json: bool,

    /// Pre-computed findings for an external detector (repeatable)
    #[arg(long, value_name = "KIND=PATH")]
    pub findings: Vec<FindingsSource>,

    /// Detectors to use: all, or a comma-separated list of regex, presidio, spacy
    #[arg(short, long)]
    pub detectors: Option<String>,

    /// Output performance metrics to stderr
    #[arg(short, long)]
    pub metrics: bool,

    /// Suppress warning messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Interactive mode - anonymize stdin line by line until Ctrl+C
    #[arg(long)]
    pub interactive: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        stop_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match self.resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                self.warn(&format!("Error: {e}"));
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if self.interactive && !self.findings.is_empty() {
            self.warn("Error: --findings describes one text and cannot be used with --interactive");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let findings = match self.load_findings() {
            Ok(findings) => findings,
            Err(e) => {
                self.warn(&format!("Error: {e}"));
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let pipeline = match PiiPipeline::from_config(&config, findings) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                tracing::error!(error = %e, "Failed to build pipeline");
                self.warn(&format!("Error: {e:#}"));
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        let output = if self.json {
            Output::Compact {
                strategy: config.anonymization.policy.clone(),
            }
        } else {
            Output::Export(self.format.unwrap_or_else(|| config.export.format()))
        };
        tracing::info!(
            policy = %pipeline.policy(),
            output = ?output,
            detectors = ?pipeline.detectors().kinds(),
            unavailable = ?pipeline.detectors().unavailable(),
            "Starting anonymization"
        );

        if self.interactive {
            return self.run_interactive(pipeline, output, stop_signal).await;
        }

        let text = match self.read_input() {
            Ok(text) => text,
            Err(e) => {
                self.warn(&format!("Error: {e}"));
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if text.trim().is_empty() {
            self.warn("Warning: No input text provided");
            return Ok(EXIT_SUCCESS);
        }

        let processed = match pipeline.anonymize_text_async(text.trim()).await {
            Ok(processed) => processed,
            Err(e) => {
                crate::log_error_with_context!(&e, "Anonymization failed");
                self.warn(&format!("Error: {e}"));
                return Ok(EXIT_PROCESSING_ERROR);
            }
        };

        let rendered = match render(&processed, &output, self.metrics) {
            Ok(rendered) => rendered,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                self.warn(&format!("Error: {e}"));
                return Ok(EXIT_PROCESSING_ERROR);
            }
        };

        match self.output {
            Some(ref path) => {
                if let Err(e) = std::fs::write(path, &rendered) {
                    self.warn(&format!("Error: failed to write {}: {e}", path.display()));
                    return Ok(EXIT_PROCESSING_ERROR);
                }
                tracing::info!(path = %path.display(), "Result written");
            }
            None => println!("{rendered}"),
        }

        Ok(EXIT_SUCCESS)
    }

    /// Configuration with command-line overrides applied
    fn resolve_config(&self, config_path: Option<&Path>) -> Result<PiiFusionConfig> {
        let mut config = load_or_default(config_path)?;

        if let Some(ref policy) = self.policy {
            tracing::debug!(policy = %policy, "Overriding policy from CLI");
            config.anonymization.policy = policy.clone();
        }

        if let Some(ref detectors) = self.detectors {
            config.detectors.enabled = parse_detectors(detectors)?;
        }

        Ok(config)
    }

    fn load_findings(&self) -> Result<Vec<FindingsDetector>> {
        self.findings
            .iter()
            .map(|source| FindingsDetector::from_file(source.kind, &source.path))
            .collect()
    }

    fn read_input(&self) -> Result<String> {
        match self.input {
            Some(ref path) => std::fs::read_to_string(path).map_err(|e| {
                PiiError::Io(format!("Failed to read input {}: {e}", path.display()))
            }),
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }

    async fn run_interactive(
        &self,
        pipeline: PiiPipeline,
        output: Output,
        stop_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        self.warn("Interactive PII Detection Mode. Enter text (Ctrl+C to exit):");

        let pipeline = Arc::new(pipeline);
        let metrics = self.metrics;
        let worker = {
            let pipeline = Arc::clone(&pipeline);
            let stop = stop_signal.clone();
            tokio::task::spawn_blocking(move || {
                let stdin = std::io::stdin();
                pipeline.process_lines(LineStream::new(stdin.lock(), stop), |processed| {
                    let rendered = render(&processed, &output, metrics)?;
                    let mut stdout = std::io::stdout().lock();
                    writeln!(stdout, "{rendered}")?;
                    stdout.flush()?;
                    Ok(())
                })
            })
        };

        let mut stop = stop_signal;
        tokio::select! {
            joined = worker => match joined? {
                Ok(lines) => {
                    tracing::info!(lines, "Input ended");
                    Ok(EXIT_SUCCESS)
                }
                Err(e) => {
                    crate::log_error_with_context!(&e, "Interactive anonymization failed");
                    self.warn(&format!("Error: {e}"));
                    Ok(EXIT_PROCESSING_ERROR)
                }
            },
            _ = stop.wait_for(|stopped| *stopped) => {
                self.warn("\nExiting interactive mode");
                Ok(EXIT_SUCCESS)
            }
        }
    }

    /// Print to stderr unless `--quiet`
    fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}

/// What the command writes for each processed text
#[derive(Debug, Clone)]
enum Output {
    Export(ExportFormat),
    /// `--json`, tagged with the policy name as given
    Compact { strategy: String },
}

/// Render a result, emitting metrics to stderr first if requested
fn render(processed: &ProcessedText, output: &Output, metrics: bool) -> Result<String> {
    if metrics {
        eprintln!("Metrics: {}", serde_json::to_string(&processed.metrics)?);
    }
    match output {
        Output::Export(format) => export(&processed.result, *format),
        Output::Compact { strategy } => processed.to_compact_json(strategy, metrics),
    }
}

/// Parse `all` or a comma-separated list of detector names
fn parse_detectors(value: &str) -> Result<Vec<DetectorKind>> {
    if value.trim().eq_ignore_ascii_case("all") {
        return Ok(DetectorKind::ALL.to_vec());
    }

    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse().map_err(PiiError::Configuration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::hash::md5_prefix;
    use test_case::test_case;

    #[test]
    fn test_findings_source_parse() {
        let source: FindingsSource = "presidio=out/presidio.json".parse().unwrap();
        assert_eq!(source.kind, DetectorKind::Presidio);
        assert_eq!(source.path, PathBuf::from("out/presidio.json"));
    }

    #[test_case("presidio" ; "missing separator")]
    #[test_case("regex=patterns.json" ; "regex takes no findings")]
    #[test_case("flair=x.json" ; "unknown detector")]
    #[test_case("spacy= " ; "empty path")]
    fn test_findings_source_rejects(input: &str) {
        assert!(input.parse::<FindingsSource>().is_err());
    }

    #[test]
    fn test_parse_detectors() {
        assert_eq!(parse_detectors("all").unwrap(), DetectorKind::ALL.to_vec());
        assert_eq!(
            parse_detectors("spacy, regex").unwrap(),
            vec![DetectorKind::Spacy, DetectorKind::Regex]
        );
        assert!(matches!(
            parse_detectors("regex,flair"),
            Err(PiiError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        std::fs::write(&input, "  Contact John at john@email.com\n").unwrap();

        let args = AnonymizeArgs {
            input: Some(input),
            output: Some(output.clone()),
            policy: Some("placeholder".to_string()),
            format: Some(ExportFormat::Text),
            detectors: Some("regex".to_string()),
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);

        let code = args.execute(None, rx).await.unwrap();
        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "Contact John at [EMAIL_REDACTED]"
        );
    }

    #[tokio::test]
    async fn test_execute_default_output_is_anonymized_text() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        std::fs::write(&input, "Contact John at john@email.com").unwrap();

        let args = AnonymizeArgs {
            input: Some(input),
            output: Some(output.clone()),
            detectors: Some("regex".to_string()),
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);
        assert_eq!(args.execute(None, rx).await.unwrap(), EXIT_SUCCESS);

        // Regex confidence 0.8 puts the email in the adaptive hash tier
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            format!("Contact John at [EMAIL_{}]", md5_prefix("john@email.com", 6))
        );
        assert!(!written.contains("john@email.com"));
    }

    #[tokio::test]
    async fn test_execute_json_writes_compact_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.json");
        std::fs::write(&input, "Contact John at john@email.com").unwrap();

        let args = AnonymizeArgs {
            input: Some(input),
            output: Some(output.clone()),
            policy: Some("partial".to_string()),
            detectors: Some("regex".to_string()),
            json: true,
            metrics: true,
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);
        assert_eq!(args.execute(None, rx).await.unwrap(), EXIT_SUCCESS);

        let written = std::fs::read_to_string(&output).unwrap();
        let record: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(record["anonymized_text"], "Contact John at [EMAIL_REDACTED]");
        assert_eq!(record["entities_found"], 1);
        assert_eq!(record["strategy"], "partial");
        assert_eq!(record["metrics"]["entities_found"], 1);
        assert!(record.get("original_text").is_none());
        assert!(record.get("mapping").is_none());
        assert!(!written.contains("john@email.com"));
    }

    #[tokio::test]
    async fn test_execute_blank_input_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blank.txt");
        std::fs::write(&input, " \n\t\n").unwrap();

        let args = AnonymizeArgs {
            input: Some(input),
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);
        assert_eq!(args.execute(None, rx).await.unwrap(), EXIT_SUCCESS);
    }

    #[tokio::test]
    async fn test_execute_missing_input_is_config_error() {
        let args = AnonymizeArgs {
            input: Some(PathBuf::from("/nonexistent/input.txt")),
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);
        assert_eq!(args.execute(None, rx).await.unwrap(), EXIT_CONFIG_ERROR);
    }

    #[tokio::test]
    async fn test_execute_bad_findings_span_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let findings = dir.path().join("presidio.json");
        std::fs::write(&input, "short").unwrap();
        std::fs::write(
            &findings,
            r#"[{"entity_type": "person", "start": 0, "end": 40, "score": 0.9}]"#,
        )
        .unwrap();

        let args = AnonymizeArgs {
            input: Some(input),
            output: Some(dir.path().join("out.json")),
            findings: vec![FindingsSource {
                kind: DetectorKind::Presidio,
                path: findings,
            }],
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);
        assert_eq!(args.execute(None, rx).await.unwrap(), EXIT_PROCESSING_ERROR);
    }

    #[tokio::test]
    async fn test_interactive_rejects_findings() {
        let args = AnonymizeArgs {
            interactive: true,
            findings: vec![FindingsSource {
                kind: DetectorKind::Spacy,
                path: PathBuf::from("spacy.json"),
            }],
            quiet: true,
            ..AnonymizeArgs::default()
        };
        let (_tx, rx) = watch::channel(false);
        assert_eq!(args.execute(None, rx).await.unwrap(), EXIT_CONFIG_ERROR);
    }
}
