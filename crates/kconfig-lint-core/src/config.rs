//! Configuration types for kconfig-lint.

use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to start from (`"zephyr"` or `"espidf"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Lowest severity that makes a run fail (default: "warning").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// File discovery configuration.
    #[serde(default)]
    pub files: FilesConfig,

    /// Per-rule configurations, layered over the preset.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Resolves the `fail_on` threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a known severity.
    pub fn fail_on(&self) -> Result<Severity, ConfigError> {
        self.fail_on
            .as_deref()
            .map_or(Ok(Severity::Warning), str::parse)
    }
}

/// File discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Glob patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extra glob patterns of file names to treat as Kconfig files.
    #[serde(default)]
    pub include: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["**/build/**".to_string(), "**/.git/**".to_string()],
            include: Vec::new(),
            respect_gitignore: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: BTreeMap<String, toml::Value>,
}

impl RuleConfig {
    /// Creates an explicitly enabled rule configuration.
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: Some(true),
            ..Self::default()
        }
    }

    /// Creates an explicitly disabled rule configuration.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    /// Sets an option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the severity override.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Layers `other` over this configuration.
    pub fn merge(&mut self, other: &Self) {
        if other.enabled.is_some() {
            self.enabled = other.enabled;
        }
        if other.severity.is_some() {
            self.severity = other.severity;
        }
        self.options
            .extend(other.options.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a non-negative integer option, rejecting values of the wrong type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] if the value is not a
    /// non-negative integer.
    pub fn get_usize(&self, rule: &str, key: &str, default: usize) -> Result<usize, ConfigError> {
        let Some(value) = self.options.get(key) else {
            return Ok(default);
        };
        value
            .as_integer()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ConfigError::InvalidOption {
                rule: rule.to_string(),
                key: key.to_string(),
                message: format!("expected a non-negative integer, got `{value}`"),
            })
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Gets a string array option.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Vec<String> {
        self.options
            .get(key)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// A resolved style: which rules run, with which parameters.
///
/// Rules absent from the profile are disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Profile name, usually the preset it came from.
    pub name: String,
    /// Per-rule configuration.
    pub rules: BTreeMap<String, RuleConfig>,
}

impl StyleProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: BTreeMap::new(),
        }
    }

    /// Adds a rule configuration.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>, config: RuleConfig) -> Self {
        self.rules.insert(rule.into(), config);
        self
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        self.rules
            .get(rule)
            .is_some_and(|c| c.enabled.unwrap_or(true))
    }

    /// Gets the configuration of a rule.
    #[must_use]
    pub fn rule_config(&self, rule: &str) -> Option<&RuleConfig> {
        self.rules.get(rule)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).and_then(|c| c.severity)
    }

    /// Layers per-rule configuration over this profile.
    pub fn merge(&mut self, rules: &BTreeMap<String, RuleConfig>) {
        for (name, config) in rules {
            self.rules.entry(name.clone()).or_default().merge(config);
        }
    }

    /// Sets one option of a rule, creating the rule entry if needed.
    pub fn set_option(&mut self, rule: &str, key: &str, value: impl Into<toml::Value>) {
        self.rules
            .entry(rule.to_string())
            .or_default()
            .options
            .insert(key.to_string(), value.into());
    }

    /// Enables or disables a rule.
    pub fn set_enabled(&mut self, rule: &str, enabled: bool) {
        self.rules.entry(rule.to_string()).or_default().enabled = Some(enabled);
    }

    /// Keeps only the named rules enabled.
    pub fn restrict_to(&mut self, rules: &[&str]) {
        for (name, config) in &mut self.rules {
            if !rules.contains(&name.as_str()) {
                config.enabled = Some(false);
            }
        }
        for rule in rules {
            self.set_enabled(rule, true);
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Preset name not recognized.
    #[error("Unknown preset `{0}` (expected `zephyr` or `espidf`)")]
    UnknownPreset(String),

    /// Rule name or code not recognized.
    #[error("Unknown rule `{0}`")]
    UnknownRule(String),

    /// Severity name not recognized.
    #[error("Unknown severity `{0}` (expected `error`, `warning` or `info`)")]
    UnknownSeverity(String),

    /// Rule option with an invalid value.
    #[error("Invalid option `{key}` for rule `{rule}`: {message}")]
    InvalidOption {
        /// Rule name.
        rule: String,
        /// Option key.
        key: String,
        /// What is wrong with the value.
        message: String,
    },
}
