//! Rule forbidding dependency cycles between layer slices.
//!
//! # Configuration
//!
//! - `layer_slices`: slice pattern with one capture group, e.g.
//!   `com.example.demo.(*)..` (required; falls back to
//!   `[project] layer_slices`)

use crate::options;
use arch_conform_core::slices::Slices;
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for slices-free-of-cycles.
pub const CODE: &str = "AC018";

/// Rule name for slices-free-of-cycles.
pub const NAME: &str = "slices-free-of-cycles";

/// What the rule checks.
pub const DESCRIPTION: &str = "Layer slices are free of dependency cycles";

/// Reports one violation per cycle between slices.
#[derive(Debug, Clone)]
pub struct SlicesFreeOfCycles {
    slices: Slices,
}

impl SlicesFreeOfCycles {
    /// Creates the rule for a slice pattern.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidPattern`] if the pattern is malformed
    /// or has no capture group.
    pub fn new(pattern: &str) -> Result<Self, RuleConfigError> {
        let slices = Slices::matching(pattern).map_err(|source| RuleConfigError::InvalidPattern {
            rule: NAME.to_string(),
            source,
        })?;
        Ok(Self { slices })
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::MissingOption`] when no pattern is
    /// configured, otherwise see [`SlicesFreeOfCycles::new`].
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let pattern = options::required_string(
            config,
            NAME,
            "layer_slices",
            config.project.layer_slices.as_ref(),
        )?;
        Self::new(&pattern)
    }
}

impl Rule for SlicesFreeOfCycles {
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
        let cycles = self.slices.cycles(ctx);
        tracing::debug!(
            pattern = %self.slices.pattern(),
            cycles = cycles.len(),
            "Checked slice cycles"
        );

        cycles
            .into_iter()
            .filter_map(|cycle| {
                let origin = cycle.edges.first()?.origin.clone();
                let steps: Vec<String> = cycle.edges.iter().map(|e| e.describe()).collect();
                Some(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        UnitRef::class_named(origin),
                        format!("cycle between slices: {cycle}"),
                    )
                    .with_help(steps.join("; ")),
                )
            })
            .collect()
    }
}
