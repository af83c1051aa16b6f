//! Option lookup shared by rule factories.
//!
//! A value under `[rules.<name>]` wins over the same value under `[project]`.

use arch_conform_core::model::Class;
use arch_conform_core::packages::{compile_all, PackagePattern};
use arch_conform_core::predicate::{simple_name_ending_with_any, Predicate};
use arch_conform_core::{list_or_default, Config, RuleConfigError};

/// Utility suffixes used when none are configured.
pub(crate) const DEFAULT_UTILITY_SUFFIXES: &[&str] = &["Util", "Utils"];

/// A list option, from the rule section first, then from `[project]`.
pub(crate) fn list(
    config: &Config,
    rule: &str,
    key: &str,
    project: Option<&Vec<String>>,
) -> Option<Vec<String>> {
    config
        .rule(rule)
        .and_then(|r| r.get_str_list(key))
        .or_else(|| project.cloned())
}

/// A string option, from the rule section first, then from `[project]`.
pub(crate) fn string(
    config: &Config,
    rule: &str,
    key: &str,
    project: Option<&String>,
) -> Option<String> {
    config
        .rule(rule)
        .and_then(|r| r.get_str(key))
        .map(String::from)
        .or_else(|| project.cloned())
}

/// A string option that must be present and non-blank.
pub(crate) fn required_string(
    config: &Config,
    rule: &str,
    key: &str,
    project: Option<&String>,
) -> Result<String, RuleConfigError> {
    match string(config, rule, key, project) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(RuleConfigError::BlankEntry {
            rule: rule.to_string(),
            option: key.to_string(),
            index: 0,
        }),
        None => Err(RuleConfigError::MissingOption {
            rule: rule.to_string(),
            option: key.to_string(),
        }),
    }
}

/// A non-negative integer option from the rule section.
pub(crate) fn count(
    config: &Config,
    rule: &str,
    key: &str,
    default: usize,
) -> Result<usize, RuleConfigError> {
    let Some(value) = config.rule(rule).and_then(|r| r.options.get(key)) else {
        return Ok(default);
    };
    value
        .as_integer()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| RuleConfigError::InvalidOption {
            rule: rule.to_string(),
            option: key.to_string(),
            reason: format!("expected a non-negative integer, got `{value}`"),
        })
}

/// A boolean option from the rule section.
pub(crate) fn flag(
    config: &Config,
    rule: &str,
    key: &str,
    default: bool,
) -> Result<bool, RuleConfigError> {
    let Some(value) = config.rule(rule).and_then(|r| r.options.get(key)) else {
        return Ok(default);
    };
    value.as_bool().ok_or_else(|| RuleConfigError::InvalidOption {
        rule: rule.to_string(),
        option: key.to_string(),
        reason: format!("expected a boolean, got `{value}`"),
    })
}

/// Classes whose simple name ends with a utility suffix.
///
/// Defaults to `Util`/`Utils`; an explicitly empty list is an error.
pub(crate) fn utility_classes(
    config: &Config,
    rule: &str,
) -> Result<Predicate<Class>, RuleConfigError> {
    let suffixes = list_or_default(
        rule,
        "utility_suffixes",
        list(
            config,
            rule,
            "utility_suffixes",
            config.project.utility_suffixes.as_ref(),
        ),
        DEFAULT_UTILITY_SUFFIXES,
    )?;
    Ok(simple_name_ending_with_any(&suffixes))
}

/// Compiles package patterns, attributing failures to the rule.
pub(crate) fn patterns(
    rule: &str,
    values: &[String],
) -> Result<Vec<PackagePattern>, RuleConfigError> {
    compile_all(values).map_err(|source| RuleConfigError::InvalidPattern {
        rule: rule.to_string(),
        source,
    })
}
