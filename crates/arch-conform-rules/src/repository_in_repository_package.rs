//! Rule placing repositories in repository packages.
//!
//! # Configuration
//!
//! - `name_pattern`: regex fully matching qualified repository names
//!   (default: `.*Repository`)
//! - `package`: package pattern repositories reside in
//!   (default: `..repository..`)

use arch_conform_core::model::Class;
use arch_conform_core::packages::PackagePattern;
use arch_conform_core::predicate::{name_matching, reside_in_any_package, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};
use regex::Regex;

/// Rule code for repository-in-repository-package.
pub const CODE: &str = "AC014";

/// Rule name for repository-in-repository-package.
pub const NAME: &str = "repository-in-repository-package";

/// What the rule checks.
pub const DESCRIPTION: &str = "Repositories reside in a repository package";

/// Default regex for repository names.
pub const DEFAULT_NAME_PATTERN: &str = ".*Repository";

/// Default package pattern for repositories.
pub const DEFAULT_PACKAGE: &str = "..repository..";

/// Requires classes named like repositories to live in a repository package.
#[derive(Debug, Clone)]
pub struct RepositoryInRepositoryPackage {
    repositories: Predicate<Class>,
    placement: Predicate<Class>,
}

impl RepositoryInRepositoryPackage {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidOption`] for a malformed regex and
    /// [`RuleConfigError::InvalidPattern`] for a malformed package pattern.
    pub fn new(name_pattern: &str, package: &str) -> Result<Self, RuleConfigError> {
        let regex = Regex::new(name_pattern).map_err(|e| RuleConfigError::InvalidOption {
            rule: NAME.to_string(),
            option: "name_pattern".to_string(),
            reason: e.to_string(),
        })?;
        let package = PackagePattern::new(package).map_err(|source| {
            RuleConfigError::InvalidPattern {
                rule: NAME.to_string(),
                source,
            }
        })?;
        Ok(Self {
            repositories: name_matching(&regex),
            placement: reside_in_any_package(&[package]),
        })
    }

    /// Creates the rule from `[rules.repository-in-repository-package]`.
    ///
    /// # Errors
    ///
    /// See [`RepositoryInRepositoryPackage::new`].
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let section = config.rule(NAME);
        let name_pattern = section
            .and_then(|r| r.get_str("name_pattern"))
            .unwrap_or(DEFAULT_NAME_PATTERN);
        let package = section
            .and_then(|r| r.get_str("package"))
            .unwrap_or(DEFAULT_PACKAGE);
        Self::new(name_pattern, package)
    }
}

impl Rule for RepositoryInRepositoryPackage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        ctx.classes()
            .filter(|c| self.repositories.test(c) && !self.placement.test(c))
            .map(|c| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::class(c),
                    format!("class is not {} (package `{}`)", self.placement, c.package()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::CodeModel;

    fn rule() -> RepositoryInRepositoryPackage {
        RepositoryInRepositoryPackage::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_detects_misplaced_repository() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.demo.repository.UserRepository"))
            .class(Class::new("com.example.demo.service.OrderRepository"))
            .class(Class::new("com.example.demo.service.OrderService"))
            .build()
            .unwrap();

        let violations = check(&rule(), &model);
        assert_eq!(units(&violations), vec!["com.example.demo.service.OrderRepository"]);
        assert_eq!(
            violations[0].message,
            "class is not residing in `..repository..` (package `com.example.demo.service`)"
        );
    }

    #[test]
    fn test_invalid_options_are_rejected() {
        assert!(matches!(
            RepositoryInRepositoryPackage::new("(", DEFAULT_PACKAGE),
            Err(RuleConfigError::InvalidOption { .. })
        ));
        assert!(matches!(
            RepositoryInRepositoryPackage::new(DEFAULT_NAME_PATTERN, "a..b-c"),
            Err(RuleConfigError::InvalidPattern { .. })
        ));
    }
}
