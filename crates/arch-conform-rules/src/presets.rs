//! Rule presets for common configurations.

use crate::catalog::{build_rules, CATALOG};
use arch_conform_core::{Config, RuleBox, RuleConfigError};
use std::fmt;
use std::str::FromStr;

/// Preset configurations for arch-conform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Rules that need no project options, for gradual adoption.
    Minimal,
    /// The classic Spring architecture checks.
    #[default]
    Standard,
    /// Every catalog rule.
    Strict,
}

/// Rule names of the standard preset.
///
/// Includes:
/// - the REST API rules (AC001 to AC004)
/// - `rest-controller-name-suffix`, `entity-version-field`, `no-checked-exceptions`
/// - `services-independent` and `utility-private-constructor`
/// - `root-package-application-class`, `logger-private-static-final`,
///   `repository-in-repository-package`
const STANDARD: &[&str] = &[
    "no-get-api-returns-collection",
    "list-endpoint-requires-pagination",
    "no-rest-controller-entity-access",
    "rest-controllers-return-dtos",
    "rest-controller-name-suffix",
    "entity-version-field",
    "no-checked-exceptions",
    "services-independent",
    "utility-private-constructor",
    "root-package-application-class",
    "logger-private-static-final",
    "repository-in-repository-package",
];

impl Preset {
    /// Names of the rules in this preset, in catalog order.
    #[must_use]
    pub fn rule_names(self) -> Vec<&'static str> {
        CATALOG
            .iter()
            .filter(|d| match self {
                Self::Minimal => !d.requires_config,
                Self::Standard => STANDARD.contains(&d.name),
                Self::Strict => true,
            })
            .map(|d| d.name)
            .collect()
    }

    /// Returns `true` if the preset contains the rule.
    #[must_use]
    pub fn contains(self, name: &str) -> bool {
        self.rule_names().contains(&name)
    }

    /// Builds the rules for this preset.
    ///
    /// # Errors
    ///
    /// Returns the first [`RuleConfigError`] raised by a rule factory.
    pub fn rules(self, config: &Config) -> Result<Vec<RuleBox>, RuleConfigError> {
        build_rules(&self.rule_names(), config)
    }

    /// Resolves the preset named in the configuration, defaulting to
    /// [`Preset::Standard`].
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::UnknownPreset`] for unknown names.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        config
            .preset
            .as_deref()
            .map_or(Ok(Self::default()), str::parse)
    }
}

impl FromStr for Preset {
    type Err = RuleConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "standard" => Ok(Self::Standard),
            "strict" => Ok(Self::Strict),
            _ => Err(RuleConfigError::UnknownPreset {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Strict => "strict",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_sizes() {
        assert_eq!(Preset::Minimal.rule_names().len(), 14);
        assert_eq!(Preset::Standard.rule_names().len(), STANDARD.len());
        assert_eq!(Preset::Strict.rule_names().len(), CATALOG.len());
    }

    #[test]
    fn test_standard_preset_listing() {
        insta::assert_snapshot!(Preset::Standard.rule_names().join("\n"), @r"
        no-get-api-returns-collection
        list-endpoint-requires-pagination
        no-rest-controller-entity-access
        rest-controllers-return-dtos
        rest-controller-name-suffix
        entity-version-field
        no-checked-exceptions
        services-independent
        utility-private-constructor
        root-package-application-class
        logger-private-static-final
        repository-in-repository-package
        ");
    }

    #[test]
    fn test_standard_names_exist_in_catalog() {
        for name in STANDARD {
            assert!(Preset::Strict.contains(name), "{name}");
        }
    }

    #[test]
    fn test_minimal_builds_without_options() {
        let rules = Preset::Minimal.rules(&Config::default()).unwrap();
        assert_eq!(rules.len(), 14);
    }

    #[test]
    fn test_standard_needs_project_options() {
        assert!(matches!(
            Preset::Standard.rules(&Config::default()),
            Err(RuleConfigError::MissingOption { .. })
        ));
    }

    #[test]
    fn test_preset_from_config() {
        assert_eq!(Preset::from_config(&Config::default()).unwrap(), Preset::Standard);

        let config = Config::parse("preset = \"Strict\"\n").unwrap();
        assert_eq!(Preset::from_config(&config).unwrap(), Preset::Strict);

        let config = Config::parse("preset = \"recommended\"\n").unwrap();
        assert_eq!(
            Preset::from_config(&config),
            Err(RuleConfigError::UnknownPreset {
                name: "recommended".to_string()
            })
        );
    }
}
