//! DTO → domain model conversion with validation.
//!
//! Every error carries the path of the offending entry, such as
//! `scopes[0].packages[1]` or `restrict-use 'no-web-in-domain'.deny[0]`.

use std::fmt;

use miette::Diagnostic;

use super::config_dto::{
    DeclarativeConfigDto, NamingDto, ReportingDto, RestrictUseDto, ScopeDepDto, ScopeDto,
    SelectionDto,
};
use super::model::{
    package_pattern, DeclarationError, DeclarativeConfig, NameSuffix, NamingConvention,
    Reporting, RestrictUse, Scope, ScopeDep, ScopeName, ScopeRef,
};
use crate::packages::PackagePattern;
use crate::types::Severity;

/// Errors during DTO → domain conversion.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    #[diagnostic(code(arch_conform::declarative::invalid))]
    Validation {
        /// Where the error occurred (e.g., "scopes[0].name").
        context: String,
        /// The underlying model error.
        source: DeclarationError,
    },

    /// The `scope` and `packages` fields are both set, or both missing
    /// where one is required.
    #[error("{rule_name}: exactly one of `scope` or `packages` must be set")]
    #[diagnostic(code(arch_conform::declarative::ambiguous_scope))]
    AmbiguousScope {
        /// The rule that has the conflict.
        rule_name: String,
    },

    /// Unknown severity string.
    #[error("{context}: unknown severity `{value}`, expected: error, warning, info")]
    #[diagnostic(code(arch_conform::declarative::severity))]
    UnknownSeverity {
        /// Where the error occurred.
        context: String,
        /// The invalid value.
        value: String,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    #[diagnostic(
        code(arch_conform::declarative::unknown_scope),
        help("every scope referenced by a rule needs a [[scopes]] entry")
    )]
    CrossRef(Vec<DeclarationError>),
}

fn format_errors(errors: &[DeclarationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Location of a value inside the declarative sections.
#[derive(Debug, Clone)]
struct At(String);

impl At {
    fn index(section: &str, index: usize) -> Self {
        Self(format!("{section}[{index}]"))
    }

    fn named(section: &str, name: &str) -> Self {
        Self(format!("{section} '{name}'"))
    }

    fn field(&self, field: &str) -> Self {
        Self(format!("{}.{field}", self.0))
    }

    fn item(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    fn invalid(&self, source: DeclarationError) -> LoadError {
        LoadError::Validation {
            context: self.0.clone(),
            source,
        }
    }
}

impl fmt::Display for At {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Converts a `DeclarativeConfigDto` to a validated `DeclarativeConfig`.
///
/// # Errors
///
/// Returns the first field error, or every unknown scope reference at once.
pub fn load(dto: DeclarativeConfigDto) -> Result<DeclarativeConfig, LoadError> {
    let scopes = dto
        .scopes
        .iter()
        .enumerate()
        .map(|(i, s)| scope(s, &At::index("scopes", i)))
        .collect::<Result<Vec<_>, _>>()?;
    let restrict_uses = dto
        .restrict_use
        .into_iter()
        .map(restrict_use)
        .collect::<Result<Vec<_>, _>>()?;
    let namings = dto
        .naming
        .into_iter()
        .map(naming)
        .collect::<Result<Vec<_>, _>>()?;
    let scope_deps = dto
        .deny_scope_dep
        .into_iter()
        .enumerate()
        .map(|(i, d)| scope_dep(d, i))
        .collect::<Result<Vec<_>, _>>()?;

    DeclarativeConfig::new(scopes, restrict_uses, namings, scope_deps)
        .map_err(LoadError::CrossRef)
}

fn patterns(values: &[String], at: &At) -> Result<Vec<PackagePattern>, LoadError> {
    values
        .iter()
        .enumerate()
        .map(|(i, p)| package_pattern(p).map_err(|e| at.item(i).invalid(e)))
        .collect()
}

fn scope_name(value: &str, at: &At) -> Result<ScopeName, LoadError> {
    ScopeName::new(value).map_err(|e| at.invalid(e))
}

fn scope(dto: &ScopeDto, at: &At) -> Result<Scope, LoadError> {
    let name = scope_name(&dto.name, &at.field("name"))?;
    Ok(Scope::new(name, patterns(&dto.packages, &at.field("packages"))?))
}

/// Resolves `scope` / `packages`; `None` when neither is set.
fn selection(dto: SelectionDto, rule: &str, at: &At) -> Result<Option<ScopeRef>, LoadError> {
    match (dto.scope, dto.packages) {
        (Some(_), Some(_)) => Err(LoadError::AmbiguousScope {
            rule_name: rule.to_string(),
        }),
        (Some(name), None) => Ok(Some(ScopeRef::Named(scope_name(&name, &at.field("scope"))?))),
        (None, Some(values)) => Ok(Some(ScopeRef::Inline(patterns(
            &values,
            &at.field("packages"),
        )?))),
        (None, None) => Ok(None),
    }
}

fn reporting(dto: ReportingDto, default: Severity, at: &At) -> Result<Reporting, LoadError> {
    let severity = match dto.severity {
        None => default,
        Some(value) => value.parse().map_err(|_| LoadError::UnknownSeverity {
            context: at.to_string(),
            value,
        })?,
    };
    Ok(Reporting::new(dto.message, dto.doc, severity))
}

fn restrict_use(dto: RestrictUseDto) -> Result<RestrictUse, LoadError> {
    let at = At::named("restrict-use", &dto.name);
    let scope = selection(dto.selection, &dto.name, &at)?.ok_or_else(|| {
        LoadError::AmbiguousScope {
            rule_name: dto.name.clone(),
        }
    })?;
    let deny = patterns(&dto.deny, &at.field("deny"))?;
    let reporting = reporting(dto.reporting, Severity::Error, &at)?;

    Ok(RestrictUse::new(dto.name, scope, deny, reporting))
}

fn naming(dto: NamingDto) -> Result<NamingConvention, LoadError> {
    let at = At::named("naming", &dto.name);
    let scope = selection(dto.selection, &dto.name, &at)?;
    let suffix = NameSuffix::new(&dto.suffix).map_err(|e| at.field("suffix").invalid(e))?;
    let reporting = reporting(dto.reporting, Severity::Warning, &at)?;

    NamingConvention::new(dto.name, scope, dto.annotated_with, suffix, reporting)
    .map_err(|e| at.invalid(e))
}

fn scope_dep(dto: ScopeDepDto, index: usize) -> Result<ScopeDep, LoadError> {
    let at = match &dto.name {
        Some(name) => At::named("deny-scope-dep", name),
        None => At::index("deny-scope-dep", index),
    };
    let from = scope_name(&dto.from, &at.field("from"))?;
    let to_at = at.field("to");
    let to = dto
        .to
        .iter()
        .enumerate()
        .map(|(i, name)| scope_name(name, &to_at.item(i)))
        .collect::<Result<Vec<_>, _>>()?;
    let reporting = reporting(dto.reporting, Severity::Error, &at)?;

    Ok(ScopeDep::new(from, to, reporting))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_and_load(toml_str: &str) -> Result<DeclarativeConfig, LoadError> {
        let dto: DeclarativeConfigDto = toml::from_str(toml_str).unwrap();
        load(dto)
    }

    // -- Happy path --

    #[test]
    fn load_empty_config() {
        let config = parse_and_load("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn load_full_config() {
        let config = parse_and_load(
            r#"
[[scopes]]
name = "domain"
packages = ["com.example.demo.domain.."]

[[scopes]]
name = "web"
packages = ["com.example.demo.web.."]

[[restrict-use]]
name = "no-hibernate-in-domain"
scope = "domain"
deny = ["org.hibernate.."]
message = "No Hibernate in domain."
doc = "ARCHITECTURE.md#domain"
severity = "error"

[[naming]]
name = "controllers-end-with-controller"
packages = ["..web.."]
annotated_with = "org.springframework.web.bind.annotation.RestController"
suffix = "Controller"
message = "Controllers are suffixed with Controller."

[[deny-scope-dep]]
from = "domain"
to = ["web"]
message = "Domain must not depend on web."
"#,
        )
        .unwrap();

        assert_eq!(config.scopes().len(), 2);
        assert_eq!(config.restrict_uses().len(), 1);
        assert_eq!(config.namings().len(), 1);
        assert_eq!(config.namings()[0].reporting().severity(), Severity::Warning);
        assert_eq!(config.scope_deps().len(), 1);
    }

    #[test]
    fn load_naming_by_annotation_only() {
        let config = parse_and_load(
            r#"
[[naming]]
name = "services"
annotated_with = "org.springframework.stereotype.Service"
suffix = "Service"
message = "msg"
"#,
        )
        .unwrap();
        assert!(config.namings()[0].scope().is_none());
    }

    // -- Error cases --

    #[test]
    fn load_rejects_both_scope_and_packages() {
        let result = parse_and_load(
            r#"
[[scopes]]
name = "domain"
packages = ["..domain.."]

[[restrict-use]]
name = "bad"
scope = "domain"
packages = ["..web.."]
deny = ["org.hibernate.."]
message = "conflict"
"#,
        );
        assert!(matches!(result, Err(LoadError::AmbiguousScope { .. })));
    }

    #[test]
    fn load_rejects_restrict_use_without_scope() {
        let result = parse_and_load(
            r#"
[[restrict-use]]
name = "bad"
deny = ["org.hibernate.."]
message = "missing scope"
"#,
        );
        assert!(matches!(result, Err(LoadError::AmbiguousScope { .. })));
    }

    #[test]
    fn load_rejects_naming_without_selector() {
        let result = parse_and_load(
            r#"
[[naming]]
name = "bad"
suffix = "Service"
message = "msg"
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::Validation {
                source: DeclarationError::MissingSelector { .. },
                ..
            })
        ));
    }

    #[test]
    fn load_rejects_invalid_scope_name() {
        let result = parse_and_load(
            r#"
[[scopes]]
name = "INVALID"
packages = ["..domain.."]
"#,
        );
        assert!(matches!(result, Err(LoadError::Validation { .. })));
    }

    #[test]
    fn load_rejects_invalid_pattern_with_context() {
        let err = parse_and_load(
            r#"
[[scopes]]
name = "domain"
packages = ["..domain..", "com.(bad"]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("scopes[0].packages[1]"));
    }

    #[test]
    fn load_rejects_unknown_severity() {
        let result = parse_and_load(
            r#"
[[restrict-use]]
name = "bad"
packages = ["..domain.."]
deny = ["org.hibernate.."]
message = "msg"
severity = "critical"
"#,
        );
        assert!(matches!(result, Err(LoadError::UnknownSeverity { .. })));
    }

    #[test]
    fn load_rejects_unknown_scope_ref() {
        let result = parse_and_load(
            r#"
[[restrict-use]]
name = "bad"
scope = "nonexistent"
deny = ["org.hibernate.."]
message = "msg"
"#,
        );
        assert!(matches!(result, Err(LoadError::CrossRef(_))));
    }
}
