//! Configuration types for arch-conform.

use crate::context::ModelScope;
use crate::packages::{compile_all, PatternError};
use crate::Severity;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration, read from `arch-conform.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("minimal", "standard", "strict").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for failure (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Where the model comes from and which classes are in scope.
    #[serde(default)]
    pub model: ModelConfig,

    /// Project conventions shared by several rules.
    #[serde(default)]
    pub project: ProjectConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
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

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Gets the configuration section of a rule.
    #[must_use]
    pub fn rule(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_name)
    }

    /// Resolves the configured failure threshold.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeverity`] for unknown values.
    pub fn fail_on_severity(&self) -> Result<Option<Severity>, ConfigError> {
        self.fail_on
            .as_deref()
            .map(|s| {
                s.parse().map_err(|_| ConfigError::InvalidSeverity {
                    value: s.to_string(),
                })
            })
            .transpose()
    }

    /// Builds the class scope described by `[model]`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] if an exclusion pattern is invalid.
    pub fn scope(&self) -> Result<ModelScope, ConfigError> {
        let exclude = compile_all(&self.model.exclude)?;
        Ok(ModelScope::default()
            .with_packages(self.model.packages.clone())
            .with_exclusions(exclude)
            .with_tests(self.model.include_tests))
    }
}

/// Model source and scope configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Snapshot path or glob, relative to the configuration file.
    #[serde(default = "default_model_path")]
    pub path: String,

    /// Root packages to analyse (empty means all).
    #[serde(default)]
    pub packages: Vec<String>,

    /// Package patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether test classes are analysed.
    #[serde(default)]
    pub include_tests: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            packages: Vec::new(),
            exclude: Vec::new(),
            include_tests: false,
        }
    }
}

fn default_model_path() -> String {
    "code-model.json".to_string()
}

/// Project conventions consumed by catalog rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Packages holding persistence entities.
    #[serde(default)]
    pub entity_packages: Option<Vec<String>>,

    /// Simple-name suffixes of data transfer objects.
    #[serde(default)]
    pub dto_suffixes: Option<Vec<String>>,

    /// Simple-name suffixes of utility classes.
    #[serde(default)]
    pub utility_suffixes: Option<Vec<String>>,

    /// Root package of the application.
    #[serde(default)]
    pub root_package: Option<String>,

    /// Slice pattern of independent services.
    #[serde(default)]
    pub service_slices: Option<String>,

    /// Slice pattern of layers that must be free of cycles.
    #[serde(default)]
    pub layer_slices: Option<String>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a string option, if set.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }

    /// Gets a string array option, distinguishing "absent" from "empty".
    #[must_use]
    pub fn get_str_list(&self, key: &str) -> Option<Vec<String>> {
        self.options.get(key).and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(arch_conform::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(arch_conform::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Unknown severity name.
    #[error("Invalid severity `{value}`")]
    #[diagnostic(
        code(arch_conform::config::severity),
        help("use one of: info, warning, error")
    )]
    InvalidSeverity {
        /// The value as written.
        value: String,
    },

    /// Invalid package pattern in `[model]`.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Pattern(#[from] PatternError),
}
