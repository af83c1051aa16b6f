//! Shared output formatting for evaluation reports.

use anyhow::Result;
use arch_conform_core::{Report, RuleOutcome, Severity};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, format: OutputFormat, fail_on: Severity) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report, fail_on),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &Report, fail_on: Severity) {
    for rule in &report.rules {
        let status = match &rule.outcome {
            RuleOutcome::Passed => "\x1b[32mpassed\x1b[0m",
            RuleOutcome::Failed if rule.fails_at(fail_on) => "\x1b[31mfailed\x1b[0m",
            RuleOutcome::Failed => "\x1b[33mfailed\x1b[0m",
            RuleOutcome::Errored { .. } => "\x1b[31merrored\x1b[0m",
        };
        println!("{:<8} {:<40} {status}", rule.code, rule.name);
    }
    println!();

    for rule in report.rules.iter().filter(|r| !r.passed()) {
        if let RuleOutcome::Errored { reason } = &rule.outcome {
            println!("{} {}", rule.code, rule.name);
            println!("  \x1b[31merror\x1b[0m: rule failed to evaluate: {reason}\n");
            continue;
        }
        for violation in &rule.violations {
            let severity_indicator = match violation.severity {
                Severity::Error => "\x1b[31merror\x1b[0m",
                Severity::Warning => "\x1b[33mwarning\x1b[0m",
                Severity::Info => "\x1b[34minfo\x1b[0m",
            };

            println!("{} {} at {}", violation.code, violation.rule, violation.unit);
            println!("  {}: {}", severity_indicator, violation.message);
            if let Some(help) = &violation.help {
                println!("  = help: {help}");
            }
            if let Some(doc_ref) = &violation.doc_ref {
                println!("  = see: {doc_ref}");
            }
            println!();
        }
    }

    let summary_color = if !report.is_success(fail_on) {
        "\x1b[31m"
    } else if report.passed() {
        "\x1b[32m"
    } else {
        "\x1b[33m"
    };

    println!("{summary_color}{}\x1b[0m", report.summary());
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for rule in &report.rules {
        if let RuleOutcome::Errored { reason } = &rule.outcome {
            println!("{}: errored [{}] {reason}", rule.name, rule.code);
        }
    }
    for violation in report.violations() {
        println!("{violation}");
    }
}
