//! Pattern library for the regex detector

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Pattern name, used in diagnostics
    pub name: String,
    /// Entity type reported for matches
    pub entity_type: String,
    /// Regular expression
    pub regex: String,
    /// Confidence score (0.0 - 1.0)
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Pattern name
    pub name: String,
    /// Compiled regex
    pub regex: Regex,
    /// Entity type reported for matches
    pub entity_type: String,
    /// Confidence score
    pub confidence: f64,
}

/// Pattern library container
///
/// Patterns are an array of tables so their file order is kept.
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    #[serde(default)]
    patterns: Vec<PatternDefinition>,
}

/// Ordered pattern registry for PII detection
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns = Vec::with_capacity(library.patterns.len());
        for def in library.patterns {
            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Invalid confidence in pattern '{}': {} (must be within 0.0 - 1.0)",
                    def.name,
                    def.confidence
                );
            }
            if def.entity_type.trim().is_empty() {
                anyhow::bail!("Pattern '{}' has an empty entity_type", def.name);
            }

            let regex = Regex::new(&def.regex)
                .with_context(|| format!("Invalid regex in pattern '{}': {}", def.name, def.regex))?;

            patterns.push(CompiledPattern {
                name: def.name,
                regex,
                entity_type: def.entity_type,
                confidence: def.confidence,
            });
        }

        Ok(Self { patterns })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get all patterns, in library order
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Get patterns reporting a specific entity type
    pub fn patterns_for_type<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a CompiledPattern> + 'a {
        self.patterns
            .iter()
            .filter(move |p| p.entity_type == entity_type)
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the registry has no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn default_confidence() -> f64 {
    0.8
}
