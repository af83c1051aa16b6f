//! Rule requiring utility classes to hide their constructors.
//!
//! # Configuration
//!
//! - `utility_suffixes`: simple-name suffixes of utility classes
//!   (default: `Util`, `Utils`; falls back to `[project] utility_suffixes`)

use crate::options::{self, DEFAULT_UTILITY_SUFFIXES};
use arch_conform_core::model::{Class, HasModifiers, Modifier};
use arch_conform_core::predicate::{simple_name_ending_with_any, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for utility-private-constructor.
pub const CODE: &str = "AC009";

/// Rule name for utility-private-constructor.
pub const NAME: &str = "utility-private-constructor";

/// What the rule checks.
pub const DESCRIPTION: &str = "Utility classes only have private constructors";

/// Requires every constructor of a utility class to be private.
#[derive(Debug, Clone)]
pub struct UtilityPrivateConstructor {
    utilities: Predicate<Class>,
}

impl Default for UtilityPrivateConstructor {
    fn default() -> Self {
        let suffixes: Vec<String> = DEFAULT_UTILITY_SUFFIXES
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        Self {
            utilities: simple_name_ending_with_any(&suffixes),
        }
    }
}

impl UtilityPrivateConstructor {
    /// Creates the rule with the default `Util`/`Utils` suffixes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleConfigError`] for an empty suffix list or blank entries.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        Ok(Self {
            utilities: options::utility_classes(config, NAME)?,
        })
    }
}

impl Rule for UtilityPrivateConstructor {
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
            .filter(|c| self.utilities.test(c))
            .flat_map(|c| c.constructors.iter())
            .filter(|ctor| !ctor.has_modifier(Modifier::Private))
            .map(|ctor| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::constructor(ctor),
                    format!("{} is not private", ctor.full_name()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{CodeModel, Constructor};

    #[test]
    fn test_public_no_arg_constructor_is_one_violation() {
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.util.FooUtils")
                    .with_constructor(Constructor::new().with_modifier(Modifier::Public)),
            )
            .class(
                Class::new("com.example.util.DateUtil")
                    .with_constructor(Constructor::new().with_modifier(Modifier::Private)),
            )
            .build()
            .unwrap();

        let violations = check(&UtilityPrivateConstructor::new(), &model);
        assert_eq!(units(&violations), vec!["com.example.util.FooUtils.<init>()"]);
        assert_eq!(
            violations[0].message,
            "com.example.util.FooUtils.<init>() is not private"
        );
    }

    #[test]
    fn test_configured_suffixes() {
        let config = Config::parse("[project]\nutility_suffixes = [\"Helper\"]\n").unwrap();
        let model = CodeModel::builder()
            .class(Class::new("com.example.FooUtils").with_constructor(Constructor::new()))
            .class(Class::new("com.example.FooHelper").with_constructor(Constructor::new()))
            .build()
            .unwrap();

        let rule = UtilityPrivateConstructor::from_config(&config).unwrap();
        assert_eq!(
            units(&check(&rule, &model)),
            vec!["com.example.FooHelper.<init>()"]
        );
    }

    #[test]
    fn test_empty_suffix_list_is_rejected() {
        let config = Config::parse("[project]\nutility_suffixes = []\n").unwrap();
        assert!(matches!(
            UtilityPrivateConstructor::from_config(&config),
            Err(RuleConfigError::EmptyList { .. })
        ));
    }
}
