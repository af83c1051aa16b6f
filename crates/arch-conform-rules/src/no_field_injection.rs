//! Rule forbidding field injection.

use crate::names::{AUTOWIRED, JAKARTA_INJECT, JAVAX_INJECT};
use arch_conform_core::model::Field;
use arch_conform_core::predicate::{annotated_with_any, Predicate};
use arch_conform_core::{EvaluationContext, Rule, UnitRef, Violation};

/// Rule code for no-field-injection.
pub const CODE: &str = "AC015";

/// Rule name for no-field-injection.
pub const NAME: &str = "no-field-injection";

/// What the rule checks.
pub const DESCRIPTION: &str = "Fields are not injected with @Autowired or @Inject";

/// Flags fields carrying `@Autowired` or `@Inject`.
#[derive(Debug, Clone)]
pub struct NoFieldInjection {
    injected: Predicate<Field>,
}

impl Default for NoFieldInjection {
    fn default() -> Self {
        Self::new()
    }
}

impl NoFieldInjection {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            injected: annotated_with_any(&[AUTOWIRED, JAVAX_INJECT, JAKARTA_INJECT]),
        }
    }
}

impl Rule for NoFieldInjection {
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
        ctx.fields()
            .filter(|f| self.injected.test(f))
            .map(|f| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::field(f),
                    format!(
                        "Field {} of class {} is using field injection. Prefer constructor injection.",
                        f.name,
                        f.owner()
                    ),
                )
            })
            .collect()
    }
}
