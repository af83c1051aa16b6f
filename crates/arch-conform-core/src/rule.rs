//! Rule trait and rule configuration errors.

use crate::context::EvaluationContext;
use crate::packages::PatternError;
use crate::types::{Severity, Violation};
use miette::Diagnostic;
use thiserror::Error;

/// An architectural rule evaluated against the code model.
///
/// Rules are pure: the same model and configuration always yield the same
/// violations in the same order.
///
/// # Example
///
/// ```ignore
/// use arch_conform_core::{EvaluationContext, Rule, Severity, UnitRef, Violation};
///
/// pub struct NoDefaultPackage;
///
/// impl Rule for NoDefaultPackage {
///     fn name(&self) -> &'static str { "no-default-package" }
///     fn code(&self) -> &'static str { "X001" }
///
///     fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
///         ctx.classes()
///             .filter(|c| c.package().is_empty())
///             .map(|c| Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 UnitRef::class(c),
///                 "class lives in the default package",
///             ))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-field-injection").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "AC015").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Evaluates the rule and returns any violations found.
    fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Errors raised while building a rule from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum RuleConfigError {
    /// A required option is absent.
    #[error("{rule}: missing required option `{option}`")]
    #[diagnostic(
        code(arch_conform::config::missing_option),
        help("set the option under [project] or [rules.<name>] in arch-conform.toml")
    )]
    MissingOption {
        /// Rule name.
        rule: String,
        /// Option name.
        option: String,
    },

    /// A required list option is empty.
    #[error("{rule}: option `{option}` must not be empty")]
    #[diagnostic(code(arch_conform::config::empty_list))]
    EmptyList {
        /// Rule name.
        rule: String,
        /// Option name.
        option: String,
    },

    /// A list option contains a blank entry.
    #[error("{rule}: option `{option}` has a blank entry at index {index}")]
    #[diagnostic(code(arch_conform::config::blank_entry))]
    BlankEntry {
        /// Rule name.
        rule: String,
        /// Option name.
        option: String,
        /// Index of the blank entry.
        index: usize,
    },

    /// An option holds an invalid package pattern.
    #[error("{rule}: {source}")]
    #[diagnostic(code(arch_conform::config::invalid_pattern))]
    InvalidPattern {
        /// Rule name.
        rule: String,
        /// Underlying pattern error.
        #[source]
        source: PatternError,
    },

    /// An option holds a value of the wrong shape.
    #[error("{rule}: option `{option}` is invalid: {reason}")]
    #[diagnostic(code(arch_conform::config::invalid_option))]
    InvalidOption {
        /// Rule name.
        rule: String,
        /// Option name.
        option: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No rule with this name or code exists.
    #[error("unknown rule `{name}`")]
    #[diagnostic(
        code(arch_conform::config::unknown_rule),
        help("run `arch-conform list-rules` to see available rules")
    )]
    UnknownRule {
        /// The requested name.
        name: String,
    },

    /// No preset with this name exists.
    #[error("unknown preset `{name}`")]
    #[diagnostic(
        code(arch_conform::config::unknown_preset),
        help("use one of: minimal, standard, strict")
    )]
    UnknownPreset {
        /// The requested preset.
        name: String,
    },
}

/// Validates that a list option is present, non-empty, and has no blank entries.
///
/// # Errors
///
/// Returns the matching [`RuleConfigError`] variant.
pub fn require_list(
    rule: &str,
    option: &str,
    values: Option<Vec<String>>,
) -> Result<Vec<String>, RuleConfigError> {
    let values = values.ok_or_else(|| RuleConfigError::MissingOption {
        rule: rule.to_string(),
        option: option.to_string(),
    })?;
    check_list(rule, option, values)
}

/// Validates that a list, when given, is non-empty and has no blank entries.
/// Absent lists fall back to `default`.
///
/// # Errors
///
/// Returns the matching [`RuleConfigError`] variant.
pub fn list_or_default(
    rule: &str,
    option: &str,
    values: Option<Vec<String>>,
    default: &[&str],
) -> Result<Vec<String>, RuleConfigError> {
    match values {
        Some(values) => check_list(rule, option, values),
        None => Ok(default.iter().map(|s| (*s).to_string()).collect()),
    }
}

fn check_list(
    rule: &str,
    option: &str,
    values: Vec<String>,
) -> Result<Vec<String>, RuleConfigError> {
    if values.is_empty() {
        return Err(RuleConfigError::EmptyList {
            rule: rule.to_string(),
            option: option.to_string(),
        });
    }
    if let Some(index) = values.iter().position(|v| v.trim().is_empty()) {
        return Err(RuleConfigError::BlankEntry {
            rule: rule.to_string(),
            option: option.to_string(),
            index,
        });
    }
    Ok(values)
}
