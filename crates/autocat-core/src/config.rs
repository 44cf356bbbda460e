//! Settings and rule files
//!
//! ## Configuration Resolution
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/autocat/config/settings.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Rule files are TOML documents with a `[[rules]]` array, used for bulk
//! administrative import and for the seeded default rules.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::NewRule;

/// Embedded default settings (compiled into binary)
const DEFAULT_SETTINGS: &str = include_str!("../../../config/settings.toml");

/// Runtime settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Shortest trimmed description worth classifying (caller-side gate)
    pub min_description_length: usize,
    /// Default database location
    pub database_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_description_length: 3,
            database_path: PathBuf::from("autocat.db"),
        }
    }
}

impl Settings {
    /// Load settings (override first, then embedded default)
    pub fn load() -> Result<Self> {
        match default_settings_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => parse_settings(DEFAULT_SETTINGS),
        }
    }

    /// Load settings from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        parse_settings(&content)
    }

    /// Whether a description is long enough to be worth classifying
    pub fn should_classify(&self, description: &str) -> bool {
        description.trim().chars().count() >= self.min_description_length
    }
}

/// Default settings override path
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("autocat").join("config").join("settings.toml"))
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    classify: Option<RawClassify>,
    database: Option<RawDatabase>,
}

#[derive(Debug, Deserialize)]
struct RawClassify {
    min_description_length: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawDatabase {
    path: Option<PathBuf>,
}

/// Parse settings from TOML content, layered onto defaults
pub fn parse_settings(content: &str) -> Result<Settings> {
    let raw: RawSettings = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))?;

    let mut settings = Settings::default();

    if let Some(classify) = raw.classify {
        if let Some(min) = classify.min_description_length {
            settings.min_description_length = min;
        }
    }

    if let Some(database) = raw.database {
        if let Some(path) = database.path {
            settings.database_path = path;
        }
    }

    Ok(settings)
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    #[serde(default)]
    rules: Vec<NewRule>,
}

/// Parse a `[[rules]]` TOML document, validating every entry
pub fn parse_rules(content: &str) -> Result<Vec<NewRule>> {
    let file: RulesFile = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid rules TOML: {}", e)))?;

    for (i, rule) in file.rules.iter().enumerate() {
        rule.validate()
            .map_err(|e| Error::Config(format!("rule #{} ({}): {}", i + 1, rule.pattern, e)))?;
    }

    Ok(file.rules)
}

/// Read and parse a rules file
pub fn load_rules_file(path: &Path) -> Result<Vec<NewRule>> {
    let content = fs::read_to_string(path)?;
    parse_rules(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatternType;

    #[test]
    fn test_parse_default_settings() {
        let settings = parse_settings(DEFAULT_SETTINGS).unwrap();
        assert_eq!(settings.min_description_length, 3);
        assert_eq!(settings.database_path, PathBuf::from("autocat.db"));
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings = parse_settings("[classify]\nmin_description_length = 5\n").unwrap();
        assert_eq!(settings.min_description_length, 5);
        assert_eq!(settings.database_path, Settings::default().database_path);

        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            parse_settings("[classify]\nmin_description_length = \"x\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_should_classify() {
        let settings = Settings::default();
        assert!(!settings.should_classify("  ab  "));
        assert!(settings.should_classify("abc"));
        assert!(settings.should_classify("Pão"));
    }

    #[test]
    fn test_parse_rules_defaults() {
        let rules = parse_rules(
            r#"
            [[rules]]
            pattern = "Continente"
            category = "Alimentação"
            confidence = 0.9
            priority = 10

            [[rules]]
            name = "Uber"
            pattern = "uber"
            pattern_type = "starts_with"
            tags = ["a", "b"]
            confidence = 0.7
            "#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].pattern_type, PatternType::Contains);
        assert_eq!(rules[0].priority, 10);
        assert!(rules[0].tags.is_empty());
        assert_eq!(rules[1].pattern_type, PatternType::StartsWith);
        assert_eq!(rules[1].priority, 0);
        assert_eq!(rules[1].tags, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_rules_rejects_invalid_entry() {
        let result = parse_rules(
            r#"
            [[rules]]
            pattern = ""
            confidence = 0.5
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_rules_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, "[[rules]]\npattern = \"galp\"\nconfidence = 0.8\n").unwrap();

        let rules = load_rules_file(&path).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "galp");
    }
}
