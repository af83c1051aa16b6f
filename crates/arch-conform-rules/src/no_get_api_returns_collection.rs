//! Rule forbidding GET endpoints that return bare collections.
//!
//! # Rationale
//!
//! A GET handler returning `List` or `Set` loads the whole result into
//! memory and leaves no room for pagination. Return a page or a DTO.

use crate::names::{GET_MAPPING, LIST, SET};
use arch_conform_core::model::Method;
use arch_conform_core::predicate::{annotated_with, raw_return_type_any, Predicate};
use arch_conform_core::{EvaluationContext, Rule, UnitRef, Violation};

/// Rule code for no-get-api-returns-collection.
pub const CODE: &str = "AC001";

/// Rule name for no-get-api-returns-collection.
pub const NAME: &str = "no-get-api-returns-collection";

/// What the rule checks.
pub const DESCRIPTION: &str = "GET endpoints must not return raw List or Set";

/// Forbids `@GetMapping` methods with raw return type `List` or `Set`.
#[derive(Debug, Clone)]
pub struct NoGetApiReturnsCollection {
    offending: Predicate<Method>,
}

impl Default for NoGetApiReturnsCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl NoGetApiReturnsCollection {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            offending: annotated_with::<Method>(GET_MAPPING).and(raw_return_type_any(&[LIST, SET])),
        }
    }
}

impl Rule for NoGetApiReturnsCollection {
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
        ctx.methods()
            .filter(|m| self.offending.test(m))
            .map(|m| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::method(m),
                    format!("method is {}", self.offending),
                )
                .with_help("return a Page or a DTO wrapping the collection")
            })
            .collect()
    }
}
