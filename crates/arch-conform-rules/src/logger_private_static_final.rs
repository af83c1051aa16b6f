//! Rule for SLF4J logger field declarations.

use crate::names::SLF4J_LOGGER;
use arch_conform_core::model::{Field, HasModifiers, Modifier};
use arch_conform_core::{EvaluationContext, Rule, UnitRef, Violation};

/// Rule code for logger-private-static-final.
pub const CODE: &str = "AC013";

/// Rule name for logger-private-static-final.
pub const NAME: &str = "logger-private-static-final";

/// What the rule checks.
pub const DESCRIPTION: &str = "Logger fields are private static final";

const REQUIRED: [Modifier; 3] = [Modifier::Private, Modifier::Static, Modifier::Final];

/// Requires `org.slf4j.Logger` fields to be `private static final`.
#[derive(Debug, Clone, Default)]
pub struct LoggerPrivateStaticFinal;

impl LoggerPrivateStaticFinal {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn missing(field: &Field) -> Vec<String> {
        REQUIRED
            .iter()
            .filter(|m| !field.has_modifier(**m))
            .map(ToString::to_string)
            .collect()
    }
}

impl Rule for LoggerPrivateStaticFinal {
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
            .filter(|f| f.field_type.is(SLF4J_LOGGER))
            .filter_map(|f| {
                let missing = Self::missing(f);
                (!missing.is_empty()).then(|| {
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        UnitRef::field(f),
                        format!("logger field is not {}", missing.join(" ")),
                    )
                })
            })
            .collect()
    }
}
