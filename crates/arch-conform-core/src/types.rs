//! Core types for violations and evaluation reports.

use crate::model::{Class, Constructor, Field, Method};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity `{other}` (expected info, warning or error)"
            )),
        }
    }
}

/// Kind of code unit a violation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// A package.
    Package,
    /// A class, interface, enum or record.
    Class,
    /// A method.
    Method,
    /// A field.
    Field,
    /// A constructor.
    Constructor,
}

impl std::fmt::Display for UnitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Package => "package",
            Self::Class => "class",
            Self::Method => "method",
            Self::Field => "field",
            Self::Constructor => "constructor",
        };
        f.write_str(s)
    }
}

/// The offending unit of a violation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitRef {
    /// Kind of unit.
    pub kind: UnitKind,
    /// Qualified (full) name of the unit.
    pub name: String,
}

impl UnitRef {
    /// Refers to a package.
    #[must_use]
    pub fn package(name: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Package,
            name: name.into(),
        }
    }

    /// Refers to a class.
    #[must_use]
    pub fn class(class: &Class) -> Self {
        Self::class_named(class.name.clone())
    }

    /// Refers to a class by qualified name.
    #[must_use]
    pub fn class_named(name: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Class,
            name: name.into(),
        }
    }

    /// Refers to a method.
    #[must_use]
    pub fn method(method: &Method) -> Self {
        Self {
            kind: UnitKind::Method,
            name: method.full_name(),
        }
    }

    /// Refers to a field.
    #[must_use]
    pub fn field(field: &Field) -> Self {
        Self {
            kind: UnitKind::Field,
            name: field.full_name(),
        }
    }

    /// Refers to a constructor.
    #[must_use]
    pub fn constructor(constructor: &Constructor) -> Self {
        Self {
            kind: UnitKind::Constructor,
            name: constructor.full_name(),
        }
    }
}

impl std::fmt::Display for UnitRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.name)
    }
}

/// A rule violation found during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "AC001").
    pub code: String,
    /// Rule name (e.g., "no-get-api-returns-collection").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// The offending unit.
    pub unit: UnitRef,
    /// Human-readable message.
    pub message: String,
    /// Optional hint for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Reference to a design document (e.g., "ARCHITECTURE.md#layers").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        unit: UnitRef,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            unit,
            message: message.into(),
            help: None,
            doc_ref: None,
        }
    }

    /// Adds a fix hint.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a design document reference.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = format!("{} {} at {}\n", self.code, self.rule, self.unit);
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(help) = &self.help {
            let _ = writeln!(output, "  = help: {help}");
        }
        if let Some(doc_ref) = &self.doc_ref {
            let _ = writeln!(output, "  = see: {doc_ref}");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.unit, self.severity, self.code, self.message
        )?;
        if let Some(doc_ref) = &self.doc_ref {
            write!(f, " (see: {doc_ref})")?;
        }
        Ok(())
    }
}

/// Outcome of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RuleOutcome {
    /// No violations.
    Passed,
    /// At least one violation.
    Failed,
    /// The rule itself failed to run.
    Errored {
        /// Panic or failure message.
        reason: String,
    },
}

/// Result of evaluating one rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleReport {
    /// Rule name.
    pub name: String,
    /// Rule code.
    pub code: String,
    /// Rule description.
    pub description: String,
    /// Outcome of the rule.
    pub outcome: RuleOutcome,
    /// Violations, ordered by unit then message.
    pub violations: Vec<Violation>,
}

impl RuleReport {
    /// Creates a report for a rule that ran to completion.
    #[must_use]
    pub fn completed(
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        violations: Vec<Violation>,
    ) -> Self {
        let outcome = if violations.is_empty() {
            RuleOutcome::Passed
        } else {
            RuleOutcome::Failed
        };
        Self {
            name: name.into(),
            code: code.into(),
            description: description.into(),
            outcome,
            violations,
        }
    }

    /// Creates a report for a rule that failed to run.
    #[must_use]
    pub fn errored(
        name: impl Into<String>,
        code: impl Into<String>,
        description: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            description: description.into(),
            outcome: RuleOutcome::Errored {
                reason: reason.into(),
            },
            violations: Vec::new(),
        }
    }

    /// Returns `true` if the rule ran and found nothing.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == RuleOutcome::Passed
    }

    /// Returns `true` if the rule errored.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        matches!(self.outcome, RuleOutcome::Errored { .. })
    }

    /// Returns `true` if the rule errored or has violations at or above `fail_on`.
    #[must_use]
    pub fn fails_at(&self, fail_on: Severity) -> bool {
        self.is_errored() || self.violations.iter().any(|v| v.severity >= fail_on)
    }

    /// Formats the assertion message a test harness shows when this rule fails.
    #[must_use]
    pub fn format_assertion(&self) -> String {
        let mut out = String::new();
        match &self.outcome {
            RuleOutcome::Errored { reason } => {
                let _ = write!(
                    out,
                    "Rule '{}' [{}] failed to evaluate: {reason}",
                    self.name, self.code
                );
            }
            _ => {
                let _ = writeln!(
                    out,
                    "Architecture Violation [{}] - Rule '{}' was violated ({} times):",
                    self.code,
                    self.description,
                    self.violations.len()
                );
                for v in &self.violations {
                    let _ = writeln!(out, "{}: {}", v.unit, v.message);
                }
            }
        }
        out.trim_end().to_string()
    }
}

/// Result of evaluating a rule set against one model.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Report {
    /// One entry per evaluated rule, in registration order.
    pub rules: Vec<RuleReport>,
    /// Number of classes in scope.
    pub classes_checked: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the report of one rule.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&RuleReport> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// All violations across rules.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.rules.iter().flat_map(|r| r.violations.iter())
    }

    /// Returns `true` if every rule passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.rules.iter().all(RuleReport::passed)
    }

    /// Returns `true` if no rule errored and no violation reaches `fail_on`.
    #[must_use]
    pub fn is_success(&self, fail_on: Severity) -> bool {
        !self.rules.iter().any(|r| r.fails_at(fail_on))
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Counts `(passed, failed, errored)` rules.
    #[must_use]
    pub fn count_by_outcome(&self) -> (usize, usize, usize) {
        self.rules
            .iter()
            .fold((0, 0, 0), |(p, f, e), r| match r.outcome {
                RuleOutcome::Passed => (p + 1, f, e),
                RuleOutcome::Failed => (p, f + 1, e),
                RuleOutcome::Errored { .. } => (p, f, e + 1),
            })
    }

    /// Summary line shared by all text outputs.
    #[must_use]
    pub fn summary(&self) -> String {
        let (passed, failed, errored) = self.count_by_outcome();
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "{} rule(s): {passed} passed, {failed} failed, {errored} errored; \
             {errors} error(s), {warnings} warning(s), {infos} info(s) in {} class(es)",
            self.rules.len(),
            self.classes_checked
        )
    }

    /// Prints the report to stdout.
    pub fn print_report(&self) {
        for rule in self.rules.iter().filter(|r| !r.passed()) {
            if let RuleOutcome::Errored { reason } = &rule.outcome {
                println!("{} {} errored: {reason}\n", rule.code, rule.name);
            }
            for violation in &rule.violations {
                println!("{}", violation.format());
            }
        }
        println!("\n{}", self.summary());
    }

    /// Formats failing rules as a test failure report.
    ///
    /// Produces a human-readable multi-line report suitable for `panic!()`
    /// messages in `cargo test` integration.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        let failing: Vec<&RuleReport> = self.rules.iter().filter(|r| r.fails_at(fail_on)).collect();
        let violation_count: usize = failing
            .iter()
            .map(|r| r.violations.iter().filter(|v| v.severity >= fail_on).count())
            .sum();

        let mut report = String::new();
        let _ = writeln!(
            report,
            "\n=== arch-conform: {} rule(s) failed, {violation_count} violation(s) ===\n",
            failing.len()
        );
        for rule in failing {
            let _ = writeln!(report, "{} [{}] {}", rule.name, rule.code, rule.description);
            if let RuleOutcome::Errored { reason } = &rule.outcome {
                let _ = writeln!(report, "  errored: {reason}");
            }
            for v in rule.violations.iter().filter(|v| v.severity >= fail_on) {
                let _ = writeln!(report, "  {}: {} {}", v.severity, v.unit, v.message);
                if let Some(help) = &v.help {
                    let _ = writeln!(report, "    = help: {help}");
                }
                if let Some(doc_ref) = &v.doc_ref {
                    let _ = writeln!(report, "    = see: {doc_ref}");
                }
            }
            let _ = writeln!(report);
        }
        let _ = writeln!(report, "Total: {}", self.summary());
        report
    }

    /// Formats the assertion message of one rule, or `None` if it passed.
    #[must_use]
    pub fn format_rule_assertion(&self, name: &str) -> Option<String> {
        self.rule(name)
            .filter(|r| !r.passed())
            .map(RuleReport::format_assertion)
    }
}
