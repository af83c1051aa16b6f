//! Rule evaluator: runs rules against one code model.

use crate::config::{Config, ConfigError};
use crate::context::{EvaluationContext, ModelScope};
use crate::model::CodeModel;
use crate::rule::{Rule, RuleBox};
use crate::types::{Report, RuleReport, Violation};

use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Builder for configuring an [`Evaluator`].
#[derive(Default)]
pub struct EvaluatorBuilder {
    rules: Vec<RuleBox>,
    config: Option<Config>,
    scope: Option<ModelScope>,
    sequential: bool,
}

impl EvaluatorBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the class scope derived from the configuration.
    #[must_use]
    pub fn scope(mut self, scope: ModelScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Runs rules one after another instead of in parallel (default: false).
    #[must_use]
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Builds the evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured scope is invalid.
    pub fn build(self) -> Result<Evaluator, ConfigError> {
        let config = self.config.unwrap_or_default();
        let scope = match self.scope {
            Some(scope) => scope,
            None => config.scope()?,
        };
        Ok(Evaluator {
            rules: self.rules,
            config,
            scope,
            sequential: self.sequential,
        })
    }
}

/// Runs every registered rule against a model and collects a [`Report`].
///
/// Use [`Evaluator::builder()`] to construct an instance.
pub struct Evaluator {
    rules: Vec<RuleBox>,
    config: Config,
    scope: ModelScope,
    sequential: bool,
}

impl Evaluator {
    /// Creates a new builder for configuring an evaluator.
    #[must_use]
    pub fn builder() -> EvaluatorBuilder {
        EvaluatorBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Evaluates all enabled rules. Rule reports keep registration order.
    #[must_use]
    pub fn evaluate(&self, model: &CodeModel) -> Report {
        let ctx = EvaluationContext::new(model, &self.scope);
        let classes_checked = ctx.class_count();
        info!(
            rules = self.rules.len(),
            classes = classes_checked,
            "Starting evaluation"
        );

        let enabled: Vec<&dyn Rule> = self
            .rules
            .iter()
            .map(|rule| &**rule)
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        let rules = if self.sequential {
            enabled.iter().map(|rule| self.run_rule(*rule, &ctx)).collect()
        } else {
            enabled
                .par_iter()
                .map(|rule| self.run_rule(*rule, &ctx))
                .collect()
        };

        let report = Report {
            rules,
            classes_checked,
        };
        let (passed, failed, errored) = report.count_by_outcome();
        info!(passed, failed, errored, "Evaluation complete");
        report
    }

    /// Runs one rule, isolating panics as an errored outcome.
    fn run_rule(&self, rule: &dyn Rule, ctx: &EvaluationContext<'_>) -> RuleReport {
        debug!("Evaluating rule: {}", rule.name());

        match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
            Ok(violations) => {
                let violations = self.apply_severity_override(rule.name(), violations);
                RuleReport::completed(rule.name(), rule.code(), rule.description(), violations)
            }
            Err(payload) => {
                let reason = panic_message(payload.as_ref());
                warn!(rule = rule.name(), %reason, "Rule panicked");
                RuleReport::errored(rule.name(), rule.code(), rule.description(), reason)
            }
        }
    }

    /// Applies severity overrides from configuration and orders violations.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations.sort_by(|a, b| {
            a.unit
                .name
                .cmp(&b.unit.name)
                .then_with(|| a.message.cmp(&b.message))
        });
        violations
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Class;
    use crate::types::{RuleOutcome, Severity, UnitRef};

    struct EveryClass;

    impl Rule for EveryClass {
        fn name(&self) -> &'static str {
            "every-class"
        }
        fn code(&self) -> &'static str {
            "T001"
        }
        fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
            let mut violations: Vec<Violation> = ctx
                .classes()
                .map(|c| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        self.default_severity(),
                        UnitRef::class(c),
                        "flagged",
                    )
                })
                .collect();
            violations.reverse();
            violations
        }
    }

    struct Panics;

    impl Rule for Panics {
        fn name(&self) -> &'static str {
            "panics"
        }
        fn code(&self) -> &'static str {
            "T002"
        }
        fn check(&self, _ctx: &EvaluationContext<'_>) -> Vec<Violation> {
            panic!("model invariant broken")
        }
    }

    struct Quiet;

    impl Rule for Quiet {
        fn name(&self) -> &'static str {
            "quiet"
        }
        fn code(&self) -> &'static str {
            "T003"
        }
        fn check(&self, _ctx: &EvaluationContext<'_>) -> Vec<Violation> {
            Vec::new()
        }
    }

    fn model() -> CodeModel {
        CodeModel::builder()
            .class(Class::new("com.example.B"))
            .class(Class::new("com.example.A"))
            .build()
            .unwrap()
    }

    #[test]
    fn panicking_rule_is_isolated() {
        let evaluator = Evaluator::builder()
            .rule(EveryClass)
            .rule(Panics)
            .rule(Quiet)
            .build()
            .unwrap();

        let report = evaluator.evaluate(&model());
        let names: Vec<_> = report.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["every-class", "panics", "quiet"]);
        assert_eq!(report.rules[0].outcome, RuleOutcome::Failed);
        assert_eq!(
            report.rules[1].outcome,
            RuleOutcome::Errored {
                reason: "model invariant broken".to_string()
            }
        );
        assert!(report.rules[2].passed());
    }

    #[test]
    fn violations_are_ordered_by_unit() {
        let evaluator = Evaluator::builder().rule(EveryClass).build().unwrap();
        let report = evaluator.evaluate(&model());
        let units: Vec<_> = report.violations().map(|v| v.unit.name.as_str()).collect();
        assert_eq!(units, vec!["com.example.A", "com.example.B"]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let model = model();
        let run = |sequential| {
            let report = Evaluator::builder()
                .rule(EveryClass)
                .rule(Quiet)
                .sequential(sequential)
                .build()
                .unwrap()
                .evaluate(&model);
            serde_json::to_string(&report).unwrap()
        };
        assert_eq!(run(true), run(false));
    }

    #[test]
    fn config_disables_and_overrides() {
        let config = Config::parse(
            r#"
[rules.quiet]
enabled = false

[rules.every-class]
severity = "warning"
"#,
        )
        .unwrap();
        let evaluator = Evaluator::builder()
            .rule(EveryClass)
            .rule(Quiet)
            .config(config)
            .build()
            .unwrap();

        let report = evaluator.evaluate(&model());
        assert_eq!(report.rules.len(), 1);
        assert!(report.violations().all(|v| v.severity == Severity::Warning));
        assert!(report.is_success(Severity::Error));
    }
}
