//! Rule forbidding supertypes of the checked exception base.
//!
//! A class violates the rule when `java.lang.Exception` can be assigned to
//! it: the class is `Exception` itself or one of its supertypes. The
//! supertypes come from the `Exception` class of the model; a model without
//! it falls back to the JDK hierarchy (`Throwable`, `Serializable`,
//! `Object`).
//!
//! # Configuration
//!
//! - `checked_subclasses`: flag checked exception subclasses instead, i.e.
//!   classes assignable to `Exception` but not to `RuntimeException`
//!   (default: `false`)

use crate::names::{EXCEPTION, OBJECT, RUNTIME_EXCEPTION, SERIALIZABLE, THROWABLE};
use crate::options;
use arch_conform_core::model::Class;
use arch_conform_core::predicate::{assignable_from, assignable_to, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for no-checked-exceptions.
pub const CODE: &str = "AC007";

/// Rule name for no-checked-exceptions.
pub const NAME: &str = "no-checked-exceptions";

/// What the rule checks.
pub const DESCRIPTION: &str = "No class may be assignable from Exception";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    ExceptionSupertypes,
    CheckedSubclasses,
}

/// Flags classes that `Exception` is assignable to.
#[derive(Debug, Clone)]
pub struct NoCheckedExceptions {
    target: Target,
}

impl Default for NoCheckedExceptions {
    fn default() -> Self {
        Self::new()
    }
}

impl NoCheckedExceptions {
    /// Creates the rule flagging `Exception` and its supertypes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: Target::ExceptionSupertypes,
        }
    }

    /// Creates the rule flagging checked exception subclasses.
    #[must_use]
    pub fn checked_subclasses() -> Self {
        Self {
            target: Target::CheckedSubclasses,
        }
    }

    /// Creates the rule from `[rules.no-checked-exceptions]`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidOption`] if `checked_subclasses`
    /// is not a boolean.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        if options::flag(config, NAME, "checked_subclasses", false)? {
            Ok(Self::checked_subclasses())
        } else {
            Ok(Self::new())
        }
    }

    fn selector(&self, ctx: &EvaluationContext<'_>) -> Predicate<Class> {
        match self.target {
            Target::CheckedSubclasses => {
                assignable_to(EXCEPTION).and(!assignable_to(RUNTIME_EXCEPTION))
            }
            Target::ExceptionSupertypes => match ctx.model().class(EXCEPTION) {
                Some(exception) => assignable_from(exception),
                None => assignable_from(&jdk_exception()),
            },
        }
    }
}

fn jdk_exception() -> Class {
    let mut exception = Class::new(EXCEPTION).extends(THROWABLE).implements(SERIALIZABLE);
    exception.supertypes.insert(OBJECT.to_string());
    exception
}

impl Rule for NoCheckedExceptions {
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
        let selector = self.selector(ctx);
        let help = match self.target {
            Target::ExceptionSupertypes => {
                "Exception must not be usable where this type is expected"
            }
            Target::CheckedSubclasses => "extend RuntimeException instead",
        };
        ctx.classes()
            .filter(|c| selector.test(c))
            .map(|c| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::class(c),
                    format!("class is {selector}"),
                )
                .with_help(help)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::CodeModel;

    fn hierarchy() -> CodeModel {
        CodeModel::builder()
            .class(Class::new("com.example.BaseThrowable"))
            .class(Class::new(EXCEPTION).extends("com.example.BaseThrowable"))
            .class(Class::new("com.example.AppException").extends(EXCEPTION))
            .class(Class::new("com.example.ConflictException").extends(RUNTIME_EXCEPTION))
            .class(Class::new(RUNTIME_EXCEPTION).extends(EXCEPTION))
            .build()
            .unwrap()
    }

    #[test]
    fn test_flags_exception_and_its_supertypes() {
        let violations = check(&NoCheckedExceptions::new(), &hierarchy());
        assert_eq!(
            units(&violations),
            vec!["com.example.BaseThrowable", "java.lang.Exception"]
        );
        assert_eq!(violations[0].message, "class is assignable from Exception");
    }

    #[test]
    fn test_falls_back_to_jdk_supertypes() {
        let model = CodeModel::builder()
            .class(Class::new(THROWABLE))
            .class(Class::new("com.example.AppException").extends(EXCEPTION))
            .class(Class::new("com.example.Order").implements(SERIALIZABLE))
            .build()
            .unwrap();

        let violations = check(&NoCheckedExceptions::new(), &model);
        assert_eq!(units(&violations), vec!["java.lang.Throwable"]);
    }

    #[test]
    fn test_checked_subclasses_option() {
        let config =
            Config::parse("[rules.no-checked-exceptions]\nchecked_subclasses = true\n").unwrap();
        let rule = NoCheckedExceptions::from_config(&config).unwrap();

        let violations = check(&rule, &hierarchy());
        assert_eq!(
            units(&violations),
            vec!["com.example.AppException", "java.lang.Exception"]
        );
        assert_eq!(
            violations[0].message,
            "class is assignable to Exception and not assignable to RuntimeException"
        );
    }

    #[test]
    fn test_plain_classes_pass() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.Order"))
            .build()
            .unwrap();

        assert!(check(&NoCheckedExceptions::new(), &model).is_empty());
        assert!(check(&NoCheckedExceptions::checked_subclasses(), &model).is_empty());
    }
}
