//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::PiiFusionConfig;
use crate::domain::errors::PiiError;
use crate::domain::result::Result;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pii-fusion.toml";

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "PII_FUSION";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into PiiFusionConfig
/// 4. Applies environment variable overrides (PII_FUSION_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`PiiError::Configuration`] if the file cannot be read or parsed,
/// a referenced environment variable is not set, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use pii_fusion::config::load_config;
///
/// let config = load_config("pii-fusion.toml").expect("Failed to load config");
/// println!("Policy: {}", config.anonymization.policy());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<PiiFusionConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(PiiError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        PiiError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Loads configuration from `path` if given, else from `pii-fusion.toml` when
/// present, else built-in defaults
///
/// Environment overrides and validation apply in every case.
pub fn load_or_default(path: Option<&Path>) -> Result<PiiFusionConfig> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_config(default_path)
            } else {
                tracing::debug!("No configuration file found, using defaults");
                finish(PiiFusionConfig::default())
            }
        }
    }
}

/// Parses configuration from TOML text
pub fn parse_config(contents: &str) -> Result<PiiFusionConfig> {
    let contents = substitute_env_vars(contents)?;

    let config: PiiFusionConfig = toml::from_str(&contents)
        .map_err(|e| PiiError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    finish(config)
}

fn finish(mut config: PiiFusionConfig) -> Result<PiiFusionConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        PiiError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| PiiError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.split_inclusive('\n') {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            continue;
        }

        let processed = re.replace_all(line, |caps: &Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
    }

    if !missing_vars.is_empty() {
        return Err(PiiError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    value.trim().parse().map_err(|_| {
        PiiError::Configuration(format!(
            "{ENV_PREFIX}_{name} must be 'true' or 'false', got '{value}'"
        ))
    })
}

/// Applies environment variable overrides using PII_FUSION_* prefix
///
/// Environment variables follow the pattern: PII_FUSION_<SECTION>_<KEY>
/// For example: PII_FUSION_ANONYMIZATION_POLICY, PII_FUSION_EXPORT_FORMAT
fn apply_env_overrides(config: &mut PiiFusionConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Detector overrides
    if let Some(val) = env_override("DETECTORS", "ENABLED") {
        config.detectors.enabled = val
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.parse().map_err(|e: String| {
                    PiiError::Configuration(format!("{ENV_PREFIX}_DETECTORS_ENABLED: {e}"))
                })
            })
            .collect::<Result<_>>()?;
    }
    if let Some(val) = env_override("DETECTORS", "PATTERN_LIBRARY") {
        config.detectors.pattern_library = Some(PathBuf::from(val));
    }
    if let Some(val) = env_override("DETECTORS", "MIN_CONFIDENCE") {
        config.detectors.min_confidence = val.trim().parse().map_err(|_| {
            PiiError::Configuration(format!(
                "{ENV_PREFIX}_DETECTORS_MIN_CONFIDENCE must be a number, got '{val}'"
            ))
        })?;
    }
    if let Some(val) = env_override("DETECTORS", "CONCURRENT") {
        config.detectors.concurrent = parse_bool("DETECTORS_CONCURRENT", &val)?;
    }

    // Anonymization overrides
    if let Some(val) = env_override("ANONYMIZATION", "POLICY") {
        config.anonymization.policy = val;
    }

    // Export overrides
    if let Some(val) = env_override("EXPORT", "FORMAT") {
        config.export.format = val;
    }

    // Audit overrides
    if let Some(val) = env_override("AUDIT", "ENABLED") {
        config.audit.enabled = parse_bool("AUDIT_ENABLED", &val)?;
    }
    if let Some(val) = env_override("AUDIT", "LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }
    if let Some(val) = env_override("AUDIT", "JSON_FORMAT") {
        config.audit.json_format = parse_bool("AUDIT_JSON_FORMAT", &val)?;
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::Policy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PII_FUSION_TEST_SUBST", "hash");
        let input = "policy = \"${PII_FUSION_TEST_SUBST}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "policy = \"hash\"");
        std::env::remove_var("PII_FUSION_TEST_SUBST");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PII_FUSION_TEST_MISSING");
        let input = "policy = \"${PII_FUSION_TEST_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("PII_FUSION_TEST_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("PII_FUSION_TEST_COMMENTED");
        let input = "# policy = \"${PII_FUSION_TEST_COMMENTED}\"\nformat = \"csv\"\n";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(PiiError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[detectors]
enabled = ["regex"]

[anonymization]
policy = "mask"

[export]
format = "summary"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.anonymization.policy(), Policy::Mask);
        assert_eq!(config.export.format, "summary");
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let result = parse_config("[export]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(PiiError::Configuration(_))));
    }

    #[test]
    fn test_parse_config_rejects_malformed_toml() {
        let result = parse_config("[export\nformat = ");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_with_explicit_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[anonymization]\npolicy = \"hash\"\n").unwrap();
        temp_file.flush().unwrap();

        let config = load_or_default(Some(temp_file.path())).unwrap();
        assert_eq!(config.anonymization.policy(), Policy::Hash);
    }
}
