//! Rule requiring an application entry point in the root package.
//!
//! # Configuration
//!
//! - `root_package`: the application's root package (required; falls back
//!   to `[project] root_package`)

use crate::options;
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for root-package-application-class.
pub const CODE: &str = "AC012";

/// Rule name for root-package-application-class.
pub const NAME: &str = "root-package-application-class";

/// What the rule checks.
pub const DESCRIPTION: &str = "The root package holds an *Application class";

const APPLICATION_SUFFIX: &str = "Application";

/// Requires at least one class directly in the root package whose simple
/// name ends with `Application`.
#[derive(Debug, Clone)]
pub struct RootPackageApplicationClass {
    root_package: String,
}

impl RootPackageApplicationClass {
    /// Creates the rule for a root package.
    #[must_use]
    pub fn new(root_package: impl Into<String>) -> Self {
        Self {
            root_package: root_package.into(),
        }
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::MissingOption`] when no root package is
    /// configured.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let root = options::required_string(
            config,
            NAME,
            "root_package",
            config.project.root_package.as_ref(),
        )?;
        Ok(Self::new(root))
    }
}

impl Rule for RootPackageApplicationClass {
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
        let found = ctx.classes().any(|c| {
            c.package() == self.root_package && c.simple_name().ends_with(APPLICATION_SUFFIX)
        });
        if found {
            return Vec::new();
        }
        vec![Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            UnitRef::package(&self.root_package),
            format!(
                "no class ending with `{APPLICATION_SUFFIX}` resides in root package `{}`",
                self.root_package
            ),
        )
        .with_help("keep the Spring Boot application class in the root package")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{Class, CodeModel};

    #[test]
    fn test_application_in_root_package_passes() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.demo.DemoApplication"))
            .class(Class::new("com.example.demo.web.UserResource"))
            .build()
            .unwrap();

        assert!(check(&RootPackageApplicationClass::new("com.example.demo"), &model).is_empty());
    }

    #[test]
    fn test_application_in_sub_package_is_not_enough() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.demo.boot.DemoApplication"))
            .build()
            .unwrap();

        let violations = check(&RootPackageApplicationClass::new("com.example.demo"), &model);
        assert_eq!(units(&violations), vec!["com.example.demo"]);
    }

    #[test]
    fn test_root_package_is_required() {
        assert!(matches!(
            RootPackageApplicationClass::from_config(&Config::default()),
            Err(RuleConfigError::MissingOption { .. })
        ));
    }
}
