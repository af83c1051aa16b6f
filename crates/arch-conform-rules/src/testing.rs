//! Helpers for rule unit tests.

use arch_conform_core::model::CodeModel;
use arch_conform_core::{EvaluationContext, ModelScope, Rule, Violation};

/// Runs a rule against the whole model (test classes excluded).
pub(crate) fn check(rule: &dyn Rule, model: &CodeModel) -> Vec<Violation> {
    let scope = ModelScope::default();
    rule.check(&EvaluationContext::new(model, &scope))
}

/// Qualified names of the offending units, in report order.
pub(crate) fn units(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.unit.name.as_str()).collect()
}
