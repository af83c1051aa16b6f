//! TOML deserialization types (DTO layer).
//!
//! These types mirror the file layout only. Validation happens in
//! [`super::loader`].

use serde::Deserialize;

/// Declarative sections of `arch-conform.toml`.
///
/// Other keys of the file (`preset`, `[model]`, ...) are ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeclarativeConfigDto {
    /// `[[scopes]]` entries.
    #[serde(default)]
    pub scopes: Vec<ScopeDto>,

    /// `[[restrict-use]]` entries.
    #[serde(default)]
    pub restrict_use: Vec<RestrictUseDto>,

    /// `[[naming]]` entries.
    #[serde(default)]
    pub naming: Vec<NamingDto>,

    /// `[[deny-scope-dep]]` entries.
    #[serde(default)]
    pub deny_scope_dep: Vec<ScopeDepDto>,
}

/// A named group of package patterns.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeDto {
    /// Scope name, referenced by rules.
    pub name: String,
    /// Package patterns (e.g., "com.example..domain..").
    pub packages: Vec<String>,
}

/// Which classes a rule applies to: a named scope or inline packages.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionDto {
    /// Name of a `[[scopes]]` entry.
    #[serde(default)]
    pub scope: Option<String>,
    /// Inline package patterns.
    #[serde(default)]
    pub packages: Option<Vec<String>>,
}

/// How a rule reports its violations.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingDto {
    /// Violation message.
    pub message: String,
    /// Design document reference, e.g. `ARCHITECTURE.md#domain`.
    #[serde(default)]
    pub doc: Option<String>,
    /// Severity name; each rule kind has its own default.
    #[serde(default)]
    pub severity: Option<String>,
}

/// `[[restrict-use]]`: selected classes must not depend on denied packages.
#[derive(Debug, Clone, Deserialize)]
pub struct RestrictUseDto {
    /// Rule name (e.g., "no-hibernate-in-domain").
    pub name: String,
    /// Selected classes.
    #[serde(flatten)]
    pub selection: SelectionDto,
    /// Denied target package patterns.
    pub deny: Vec<String>,
    /// Message, doc and severity.
    #[serde(flatten)]
    pub reporting: ReportingDto,
}

/// `[[naming]]`: selected classes must end with a suffix.
#[derive(Debug, Clone, Deserialize)]
pub struct NamingDto {
    /// Rule name.
    pub name: String,
    /// Selected classes, narrowed by `annotated_with`.
    #[serde(flatten)]
    pub selection: SelectionDto,
    /// Qualified annotation name selecting classes.
    #[serde(default)]
    pub annotated_with: Option<String>,
    /// Required simple-name suffix.
    pub suffix: String,
    /// Message, doc and severity.
    #[serde(flatten)]
    pub reporting: ReportingDto,
}

/// `[[deny-scope-dep]]`: one scope must not depend on others.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeDepDto {
    /// Optional rule name.
    #[serde(default)]
    pub name: Option<String>,
    /// Source scope name.
    pub from: String,
    /// Denied target scope names.
    pub to: Vec<String>,
    /// Message, doc and severity.
    #[serde(flatten)]
    pub reporting: ReportingDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrelated_keys_are_ignored() {
        let dto: DeclarativeConfigDto =
            toml::from_str("preset = \"strict\"\n[model]\npath = \"m.json\"\n").unwrap();
        assert!(dto.scopes.is_empty());
        assert!(dto.restrict_use.is_empty());
        assert!(dto.naming.is_empty());
        assert!(dto.deny_scope_dep.is_empty());
    }

    #[test]
    fn flattened_selection_and_reporting() {
        let dto: DeclarativeConfigDto = toml::from_str(
            r#"
[[restrict-use]]
name = "no-jpa-in-web"
packages = ["com.example.demo.web.."]
deny = ["javax.persistence.."]
message = "Web must use DTOs."
doc = "ARCHITECTURE.md#web"

[[naming]]
name = "services-end-with-service"
scope = "services"
annotated_with = "org.springframework.stereotype.Service"
suffix = "Service"
message = "Services are suffixed with Service."
severity = "error"
"#,
        )
        .unwrap();

        let restrict = &dto.restrict_use[0];
        assert!(restrict.selection.scope.is_none());
        assert_eq!(
            restrict.selection.packages,
            Some(vec!["com.example.demo.web..".to_string()])
        );
        assert_eq!(restrict.reporting.doc.as_deref(), Some("ARCHITECTURE.md#web"));
        assert!(restrict.reporting.severity.is_none());

        let naming = &dto.naming[0];
        assert_eq!(naming.selection.scope.as_deref(), Some("services"));
        assert_eq!(naming.reporting.severity.as_deref(), Some("error"));
    }

    #[test]
    fn missing_message_is_rejected() {
        let result: Result<DeclarativeConfigDto, _> =
            toml::from_str("[[deny-scope-dep]]\nfrom = \"domain\"\nto = [\"web\"]\n");
        assert!(result.is_err());
    }
}
