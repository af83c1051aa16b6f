//! Rule requiring utility classes to expose only static methods.
//!
//! Shares the `utility_suffixes` option with
//! `utility-private-constructor`.

use crate::options;
use arch_conform_core::model::{Class, HasModifiers, Modifier};
use arch_conform_core::predicate::Predicate;
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for utility-static-methods.
pub const CODE: &str = "AC011";

/// Rule name for utility-static-methods.
pub const NAME: &str = "utility-static-methods";

/// What the rule checks.
pub const DESCRIPTION: &str = "Utility classes only have static methods";

/// Requires every method of a utility class to be static.
#[derive(Debug, Clone)]
pub struct UtilityStaticMethods {
    utilities: Predicate<Class>,
}

impl UtilityStaticMethods {
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

impl Rule for UtilityStaticMethods {
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
            .flat_map(|c| c.methods.iter())
            .filter(|m| !m.has_modifier(Modifier::Static))
            .map(|m| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::method(m),
                    format!("{} is not static", m.full_name()),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{CodeModel, Method, TypeRef};

    #[test]
    fn test_detects_instance_method() {
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.util.StringUtils")
                    .with_method(
                        Method::new("isBlank", TypeRef::raw("boolean"))
                            .with_parameter(TypeRef::raw("java.lang.String"))
                            .with_modifier(Modifier::Static),
                    )
                    .with_method(Method::new("reset", TypeRef::raw("void"))),
            )
            .build()
            .unwrap();

        let rule = UtilityStaticMethods::from_config(&Config::default()).unwrap();
        let violations = check(&rule, &model);
        assert_eq!(units(&violations), vec!["com.example.util.StringUtils.reset()"]);
        assert_eq!(violations[0].message, "com.example.util.StringUtils.reset() is not static");
    }
}
