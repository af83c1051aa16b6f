//! Rule keeping service slices independent of each other.
//!
//! # Configuration
//!
//! - `service_slices`: slice pattern with one capture group, e.g.
//!   `com.example.(*service).domain` (required; falls back to
//!   `[project] service_slices`)

use crate::options;
use arch_conform_core::slices::Slices;
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};
use std::collections::BTreeSet;

/// Rule code for services-independent.
pub const CODE: &str = "AC008";

/// Rule name for services-independent.
pub const NAME: &str = "services-independent";

/// What the rule checks.
pub const DESCRIPTION: &str = "Service slices must not depend on each other";

/// Reports every class-level dependency that crosses service slices.
#[derive(Debug, Clone)]
pub struct ServicesIndependent {
    slices: Slices,
}

impl ServicesIndependent {
    /// Creates the rule for a slice pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidPattern`] if the pattern is malformed
    /// or has no capture group.
    pub fn new(pattern: &str) -> Result<Self, RuleConfigError> {
        let slices = Slices::matching(pattern).map_err(|source| RuleConfigError::InvalidPattern {
            rule: NAME.to_string(),
            source,
        })?;
        Ok(Self { slices })
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::MissingOption`] when no pattern is
    /// configured, otherwise see [`ServicesIndependent::new`].
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let pattern = options::required_string(
            config,
            NAME,
            "service_slices",
            config.project.service_slices.as_ref(),
        )?;
        Self::new(&pattern)
    }
}

impl Rule for ServicesIndependent {
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
        let mut seen = BTreeSet::new();
        self.slices
            .dependencies(ctx)
            .into_iter()
            .filter(|dep| seen.insert((dep.edge.origin.as_str(), dep.edge.target.as_str())))
            .map(|dep| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::class_named(&dep.edge.origin),
                    format!(
                        "slice `{}` depends on slice `{}`: {}",
                        dep.from,
                        dep.to,
                        dep.edge.describe()
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{Class, CodeModel, CodeModelBuilder};

    const PATTERN: &str = "com.example.(*service).domain";

    fn services() -> CodeModelBuilder {
        CodeModel::builder()
            .class(Class::new("com.example.userservice.domain.User"))
            .class(Class::new("com.example.userservice.domain.Address"))
            .class(Class::new("com.example.orderservice.domain.Order"))
    }

    #[test]
    fn test_independent_services_pass() {
        let model = services()
            .calls(
                "com.example.userservice.domain.User",
                "com.example.userservice.domain.Address",
            )
            .build()
            .unwrap();

        assert!(check(&ServicesIndependent::new(PATTERN).unwrap(), &model).is_empty());
    }

    #[test]
    fn test_one_violation_per_crossing_class_pair() {
        let model = services()
            .calls(
                "com.example.orderservice.domain.Order",
                "com.example.userservice.domain.User",
            )
            .calls(
                "com.example.orderservice.domain.Order",
                "com.example.userservice.domain.User",
            )
            .build()
            .unwrap();

        let violations = check(&ServicesIndependent::new(PATTERN).unwrap(), &model);
        assert_eq!(units(&violations), vec!["com.example.orderservice.domain.Order"]);
        assert!(violations[0]
            .message
            .starts_with("slice `orderservice` depends on slice `userservice`: "));
    }

    #[test]
    fn test_pattern_errors_are_configuration_errors() {
        assert!(matches!(
            ServicesIndependent::new("com.example..domain"),
            Err(RuleConfigError::InvalidPattern { .. })
        ));
        assert!(matches!(
            ServicesIndependent::from_config(&Config::default()),
            Err(RuleConfigError::MissingOption { .. })
        ));
    }
}
