//! Rule for the naming convention of REST controllers.
//!
//! # Configuration
//!
//! - `suffix`: required simple-name suffix (default: `Resource`)

use crate::names::REST_CONTROLLER;
use crate::options;
use arch_conform_core::model::Annotated;
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for rest-controller-name-suffix.
pub const CODE: &str = "AC005";

/// Rule name for rest-controller-name-suffix.
pub const NAME: &str = "rest-controller-name-suffix";

/// What the rule checks.
pub const DESCRIPTION: &str = "REST controller names end with Resource";

/// Default controller suffix.
pub const DEFAULT_SUFFIX: &str = "Resource";

/// Requires `@RestController` simple names to end with a suffix.
#[derive(Debug, Clone)]
pub struct RestControllerNameSuffix {
    suffix: String,
}

impl Default for RestControllerNameSuffix {
    fn default() -> Self {
        Self::new()
    }
}

impl RestControllerNameSuffix {
    /// Creates the rule with the `Resource` suffix.
    #[must_use]
    pub fn new() -> Self {
        Self {
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Sets the required suffix.
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Creates the rule from `[rules.rest-controller-name-suffix]`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::BlankEntry`] for a blank suffix.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        match options::string(config, NAME, "suffix", None) {
            None => Ok(Self::new()),
            Some(_) => {
                let suffix = options::required_string(config, NAME, "suffix", None)?;
                Ok(Self::new().suffix(suffix))
            }
        }
    }
}

impl Rule for RestControllerNameSuffix {
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
            .filter(|c| c.is_annotated_with(REST_CONTROLLER))
            .filter(|c| !c.simple_name().ends_with(self.suffix.as_str()))
            .map(|c| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::class(c),
                    format!(
                        "simple name `{}` does not end with `{}`",
                        c.simple_name(),
                        self.suffix
                    ),
                )
            })
            .collect()
    }
}
