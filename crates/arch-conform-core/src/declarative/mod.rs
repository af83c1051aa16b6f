//! Declarative architecture rules driven by TOML configuration.
//!
//! `[[scopes]]` name groups of packages. `[[restrict-use]]`, `[[naming]]`
//! and `[[deny-scope-dep]]` declare constraints over them, and each kind
//! that has at least one entry becomes one [`Rule`](crate::Rule):
//!
//! | Section | Code | Rule name |
//! |---------|------|-----------|
//! | `[[restrict-use]]` | ALD001 | `restrict-use` |
//! | `[[naming]]` | ALD002 | `naming` |
//! | `[[deny-scope-dep]]` | ALD003 | `deny-scope-dep` |
//!
//! ```text
//! TOML text
//!   ↓ serde                config_dto
//!   ↓ validate + convert   loader
//! DeclarativeConfig        model
//!   ↓ create_rules()       rules
//! Vec<RuleBox>
//! ```

use std::sync::Arc;

use miette::Diagnostic;

use crate::rule::RuleBox;

pub mod config_dto;
pub mod loader;
pub mod model;
pub mod rules;

/// Errors from parsing TOML and loading declarative rules.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    #[diagnostic(code(arch_conform::declarative::toml))]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and creates all applicable declarative rules.
///
/// Returns `Ok(vec![])` if no declarative sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str) -> Result<Vec<RuleBox>, LoadRulesError> {
    let dto: config_dto::DeclarativeConfigDto = toml::from_str(content)?;
    Ok(create_rules(loader::load(dto)?))
}

/// Creates one rule per declared kind, in section order.
#[must_use]
pub fn create_rules(config: model::DeclarativeConfig) -> Vec<RuleBox> {
    let config = Arc::new(config);
    let mut result: Vec<RuleBox> = Vec::new();

    if !config.restrict_uses().is_empty() {
        result.push(Box::new(rules::RestrictUseRule::new(Arc::clone(&config))));
    }
    if !config.namings().is_empty() {
        result.push(Box::new(rules::NamingRule::new(Arc::clone(&config))));
    }
    if !config.scope_deps().is_empty() {
        result.push(Box::new(rules::ScopeDepRule::new(config)));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sections_yield_no_rules() {
        let rules = load_rules_from_toml("preset = \"standard\"\n").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn one_rule_per_declared_kind() {
        let rules = load_rules_from_toml(
            r#"
[[scopes]]
name = "domain"
packages = ["..domain.."]

[[scopes]]
name = "web"
packages = ["..web.."]

[[deny-scope-dep]]
from = "domain"
to = ["web"]
message = "Domain must not depend on web."

[[naming]]
name = "services"
annotated_with = "org.springframework.stereotype.Service"
suffix = "Service"
message = "Services end with Service."
"#,
        )
        .unwrap();
        let codes: Vec<_> = rules.iter().map(|r| r.code()).collect();
        assert_eq!(codes, vec!["ALD002", "ALD003"]);
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            load_rules_from_toml("[[scopes]]\nname = 3\n"),
            Err(LoadRulesError::Toml(_))
        ));
    }
}
