//! Rule keeping utility classes out of dependency injection.
//!
//! Shares the `utility_suffixes` option with
//! `utility-private-constructor`.

use crate::names::{COMPONENT, JAKARTA_INJECT, JAVAX_INJECT};
use crate::options;
use arch_conform_core::model::Class;
use arch_conform_core::predicate::{annotated_with_any, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for utility-not-injected.
pub const CODE: &str = "AC010";

/// Rule name for utility-not-injected.
pub const NAME: &str = "utility-not-injected";

/// What the rule checks.
pub const DESCRIPTION: &str = "Utility classes are not components or injected";

/// Forbids `@Component` and `@Inject` on utility classes.
#[derive(Debug, Clone)]
pub struct UtilityNotInjected {
    utilities: Predicate<Class>,
    injected: Predicate<Class>,
}

impl UtilityNotInjected {
    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleConfigError`] for an empty suffix list or blank entries.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        Ok(Self {
            utilities: options::utility_classes(config, NAME)?,
            injected: annotated_with_any(&[COMPONENT, JAVAX_INJECT, JAKARTA_INJECT]),
        })
    }
}

impl Rule for UtilityNotInjected {
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
            .filter(|c| self.utilities.test(c) && self.injected.test(c))
            .map(|c| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::class(c),
                    format!("{} is annotated with @Component/@Inject annotation", c.name),
                )
            })
            .collect()
    }
}
