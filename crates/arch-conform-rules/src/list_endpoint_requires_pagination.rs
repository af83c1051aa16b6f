//! Rule requiring pagination on list-named GET endpoints.
//!
//! # Configuration
//!
//! - `name_pattern`: regular expression a method name must fully match to
//!   count as a list endpoint (default: `\w*List\b`)

use crate::names::{GET_MAPPING, PAGE};
use crate::options;
use arch_conform_core::model::Method;
use arch_conform_core::predicate::{annotated_with, method_name_matching, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};
use regex::Regex;

/// Rule code for list-endpoint-requires-pagination.
pub const CODE: &str = "AC002";

/// Rule name for list-endpoint-requires-pagination.
pub const NAME: &str = "list-endpoint-requires-pagination";

/// What the rule checks.
pub const DESCRIPTION: &str = "GET endpoints named like lists must return a Page";

/// Default list endpoint name pattern.
pub const DEFAULT_NAME_PATTERN: &str = r"\w*List\b";

/// Requires list-named `@GetMapping` methods to return `Page`.
#[derive(Debug, Clone)]
pub struct ListEndpointRequiresPagination {
    endpoints: Predicate<Method>,
}

impl ListEndpointRequiresPagination {
    /// Creates the rule for method names fully matching `name_pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidOption`] for a malformed pattern.
    pub fn new(name_pattern: &str) -> Result<Self, RuleConfigError> {
        let regex = Regex::new(name_pattern).map_err(|e| RuleConfigError::InvalidOption {
            rule: NAME.to_string(),
            option: "name_pattern".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            endpoints: annotated_with::<Method>(GET_MAPPING).and(method_name_matching(&regex)),
        })
    }

    /// Creates the rule from `[rules.list-endpoint-requires-pagination]`.
    ///
    /// # Errors
    ///
    /// See [`ListEndpointRequiresPagination::new`].
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let pattern = options::string(config, NAME, "name_pattern", None)
            .unwrap_or_else(|| DEFAULT_NAME_PATTERN.to_string());
        Self::new(&pattern)
    }
}

impl Rule for ListEndpointRequiresPagination {
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
            .filter(|m| self.endpoints.test(m) && !m.return_type.is(PAGE))
            .map(|m| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::method(m),
                    format!(
                        "method is {} but returns {} instead of {PAGE}",
                        self.endpoints, m.return_type.name
                    ),
                )
            })
            .collect()
    }
}
