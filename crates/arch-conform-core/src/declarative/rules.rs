//! Declarative rule implementations.
//!
//! Converts domain model rules into [`Rule`] trait implementations
//! that walk the code model.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::context::EvaluationContext;
use crate::declarative::model::DeclarativeConfig;
use crate::model::package_of;
use crate::rule::Rule;
use crate::types::{Severity, UnitRef, Violation};

// ────────────────────────────────────────────
// RestrictUseRule
// ────────────────────────────────────────────

const RESTRICT_USE_NAME: &str = "restrict-use";
const RESTRICT_USE_CODE: &str = "ALD001";

/// Enforces `[[restrict-use]]` declarations.
///
/// For every dependency whose origin lies in a rule's scope, checks the
/// target package against the deny list. One violation is reported per
/// origin/target class pair.
pub struct RestrictUseRule {
    config: Arc<DeclarativeConfig>,
}

impl RestrictUseRule {
    /// Creates a new restrict-use rule backed by the given config.
    #[must_use]
    pub fn new(config: Arc<DeclarativeConfig>) -> Self {
        Self { config }
    }
}

impl Rule for RestrictUseRule {
    fn name(&self) -> &'static str {
        RESTRICT_USE_NAME
    }

    fn code(&self) -> &'static str {
        RESTRICT_USE_CODE
    }

    fn description(&self) -> &'static str {
        "Deny dependencies on specified packages within a scope"
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let mut seen = BTreeSet::new();
        let mut violations = Vec::new();

        for (index, rule) in self.config.restrict_uses().iter().enumerate() {
            for edge in ctx.dependencies() {
                if edge.origin == edge.target
                    || !self
                        .config
                        .scope_ref_contains(rule.scope(), package_of(&edge.origin))
                    || !rule.is_denied(edge.target_package())
                {
                    continue;
                }
                if !seen.insert((index, edge.origin.as_str(), edge.target.as_str())) {
                    continue;
                }

                let detail = format!("`{}` -> `{}`", edge.origin, edge.target);
                violations.push(
                    rule.reporting()
                        .violation(
                            RESTRICT_USE_CODE,
                            rule.name(),
                            UnitRef::class_named(&edge.origin),
                            &detail,
                        )
                        .with_help(edge.describe()),
                );
            }
        }

        violations
    }
}

// ────────────────────────────────────────────
// NamingRule
// ────────────────────────────────────────────

const NAMING_NAME: &str = "naming";
const NAMING_CODE: &str = "ALD002";

/// Enforces `[[naming]]` declarations on selected classes.
pub struct NamingRule {
    config: Arc<DeclarativeConfig>,
}

impl NamingRule {
    /// Creates a new naming rule backed by the given config.
    #[must_use]
    pub fn new(config: Arc<DeclarativeConfig>) -> Self {
        Self { config }
    }
}

impl Rule for NamingRule {
    fn name(&self) -> &'static str {
        NAMING_NAME
    }

    fn code(&self) -> &'static str {
        NAMING_CODE
    }

    fn description(&self) -> &'static str {
        "Require a simple-name suffix on selected classes"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let mut violations = Vec::new();

        for naming in self.config.namings() {
            for class in ctx.classes() {
                if !self.config.naming_selects(naming, class)
                    || class.simple_name().ends_with(naming.suffix())
                {
                    continue;
                }

                let detail = format!(
                    "`{}` should end with `{}`",
                    class.simple_name(),
                    naming.suffix()
                );
                violations.push(naming.reporting().violation(
                    NAMING_CODE,
                    naming.name(),
                    UnitRef::class(class),
                    &detail,
                ));
            }
        }

        violations
    }
}

// ────────────────────────────────────────────
// ScopeDepRule
// ────────────────────────────────────────────

const SCOPE_DEP_NAME: &str = "deny-scope-dep";
const SCOPE_DEP_CODE: &str = "ALD003";

/// Enforces `[[deny-scope-dep]]` declarations.
///
/// A dependency crosses a denied boundary when its origin package lies in
/// the `from` scope and its target package lies in a denied scope that the
/// origin is not itself part of.
pub struct ScopeDepRule {
    config: Arc<DeclarativeConfig>,
}

impl ScopeDepRule {
    /// Creates a new scope-dep rule backed by the given config.
    #[must_use]
    pub fn new(config: Arc<DeclarativeConfig>) -> Self {
        Self { config }
    }
}

impl Rule for ScopeDepRule {
    fn name(&self) -> &'static str {
        SCOPE_DEP_NAME
    }

    fn code(&self) -> &'static str {
        SCOPE_DEP_CODE
    }

    fn description(&self) -> &'static str {
        "Deny scope-level dependencies"
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        let mut seen = BTreeSet::new();
        let mut violations = Vec::new();

        for edge in ctx.dependencies() {
            let origin_scopes = self.config.scopes_for_package(package_of(&edge.origin));
            if origin_scopes.is_empty() {
                continue;
            }
            let target_scopes = self.config.scopes_for_package(edge.target_package());

            for (index, dep) in self.config.scope_deps().iter().enumerate() {
                if !origin_scopes.contains(&dep.from_scope()) {
                    continue;
                }
                for target_scope in &target_scopes {
                    if !dep.is_denied(target_scope) || origin_scopes.contains(target_scope) {
                        continue;
                    }
                    if !seen.insert((
                        index,
                        edge.origin.as_str(),
                        edge.target.as_str(),
                        target_scope.as_str(),
                    )) {
                        continue;
                    }

                    let detail = format!(
                        "`{}` -> `{}` (scope `{}` \u{2192} scope `{}`)",
                        edge.origin,
                        edge.target,
                        dep.from_scope(),
                        target_scope,
                    );
                    violations.push(
                        dep.reporting()
                            .violation(
                                SCOPE_DEP_CODE,
                                SCOPE_DEP_NAME,
                                UnitRef::class_named(&edge.origin),
                                &detail,
                            )
                            .with_help(edge.describe()),
                    );
                }
            }
        }

        violations
    }
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ModelScope;
    use crate::declarative::model::*;
    use crate::model::{AccessEdge, AccessKind, Class, CodeModel};

    fn pattern(p: &str) -> crate::packages::PackagePattern {
        package_pattern(p).unwrap()
    }

    fn scope(name: &str, patterns: &[&str]) -> Scope {
        Scope::new(
            ScopeName::new(name).unwrap(),
            patterns.iter().map(|p| pattern(p)).collect(),
        )
    }

    fn model() -> CodeModel {
        CodeModel::builder()
            .class(Class::new("com.example.domain.Order"))
            .class(Class::new("com.example.domain.OrderRepository"))
            .class(Class::new("com.example.web.OrderController"))
            .class(Class::new("com.example.infra.JpaOrders"))
            .calls("com.example.domain.Order", "org.hibernate.Session")
            .calls("com.example.domain.Order", "com.example.infra.JpaOrders")
            .access(AccessEdge::new(
                "com.example.domain.Order",
                "org.hibernate.Session",
                AccessKind::TypeReference,
            ))
            .calls("com.example.domain.Order", "com.example.domain.OrderRepository")
            .calls("com.example.infra.JpaOrders", "com.example.domain.Order")
            .calls("com.example.web.OrderController", "org.hibernate.Session")
            .build()
            .unwrap()
    }

    fn run(rule: &dyn Rule) -> Vec<Violation> {
        let model = model();
        let scope = ModelScope::default();
        rule.check(&EvaluationContext::new(&model, &scope))
    }

    // ── RestrictUseRule ──

    fn make_restrict_config() -> Arc<DeclarativeConfig> {
        let restrict = vec![RestrictUse::new(
            "no-hibernate-in-domain".to_string(),
            ScopeRef::Named(ScopeName::new("domain").unwrap()),
            vec![pattern("org.hibernate..")],
            Reporting::new(
                "Domain must stay persistence-agnostic.",
                Some("ARCHITECTURE.md#domain".to_string()),
                Severity::Error,
            ),
        )];
        Arc::new(
            DeclarativeConfig::new(vec![scope("domain", &["..domain.."])], restrict, vec![], vec![])
                .unwrap(),
        )
    }

    #[test]
    fn restrict_detects_denied_dependency_once_per_pair() {
        let violations = run(&RestrictUseRule::new(make_restrict_config()));

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "no-hibernate-in-domain");
        assert_eq!(violations[0].code, RESTRICT_USE_CODE);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].unit.name, "com.example.domain.Order");
        assert!(violations[0].message.contains("org.hibernate.Session"));
        assert_eq!(
            violations[0].doc_ref.as_deref(),
            Some("ARCHITECTURE.md#domain")
        );
    }

    #[test]
    fn restrict_inline_scope() {
        let config = Arc::new(
            DeclarativeConfig::new(
                vec![],
                vec![RestrictUse::new(
                    "no-hibernate-in-web".to_string(),
                    ScopeRef::Inline(vec![pattern("..web..")]),
                    vec![pattern("org.hibernate..")],
                    Reporting::new("Web must go through repositories.", None, Severity::Warning),
                )],
                vec![],
                vec![],
            )
            .unwrap(),
        );

        let violations = run(&RestrictUseRule::new(config));

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].unit.name, "com.example.web.OrderController");
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(violations[0].doc_ref.is_none());
    }

    #[test]
    fn restrict_ignores_classes_outside_scope() {
        let config = Arc::new(
            DeclarativeConfig::new(
                vec![],
                vec![RestrictUse::new(
                    "no-hibernate-in-infra".to_string(),
                    ScopeRef::Inline(vec![pattern("..infra..")]),
                    vec![pattern("org.hibernate..")],
                    Reporting::new("msg", None, Severity::Error),
                )],
                vec![],
                vec![],
            )
            .unwrap(),
        );
        assert!(run(&RestrictUseRule::new(config)).is_empty());
    }

    // ── NamingRule ──

    #[test]
    fn naming_flags_selected_classes_without_suffix() {
        let config = Arc::new(
            DeclarativeConfig::new(
                vec![],
                vec![],
                vec![NamingConvention::new(
                    "domain-repositories".to_string(),
                    Some(ScopeRef::Inline(vec![pattern("..domain..")])),
                    None,
                    NameSuffix::new("Repository").unwrap(),
                    Reporting::new("Domain classes are repositories", None, Severity::Warning),
                )
                .unwrap()],
                vec![],
            )
            .unwrap(),
        );

        let violations = run(&NamingRule::new(config));

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, NAMING_CODE);
        assert_eq!(violations[0].unit.name, "com.example.domain.Order");
        assert!(violations[0].message.ends_with("`Order` should end with `Repository`"));
    }

    // ── ScopeDepRule ──

    fn make_scope_dep_config() -> Arc<DeclarativeConfig> {
        let scopes = vec![
            scope("domain", &["..domain.."]),
            scope("infra", &["..infra.."]),
        ];
        let deps = vec![ScopeDep::new(
            ScopeName::new("domain").unwrap(),
            vec![ScopeName::new("infra").unwrap()],
            Reporting::new(
                "Domain must not depend on infra.",
                Some("ARCHITECTURE.md#layers".to_string()),
                Severity::Error,
            ),
        )];
        Arc::new(DeclarativeConfig::new(scopes, vec![], vec![], deps).unwrap())
    }

    #[test]
    fn scope_dep_detects_forbidden_dependency() {
        let violations = run(&ScopeDepRule::new(make_scope_dep_config()));

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, SCOPE_DEP_CODE);
        assert_eq!(violations[0].unit.name, "com.example.domain.Order");
        assert_eq!(
            violations[0].message,
            "Domain must not depend on infra.: `com.example.domain.Order` -> \
             `com.example.infra.JpaOrders` (scope `domain` \u{2192} scope `infra`)"
        );
        assert_eq!(
            violations[0].doc_ref.as_deref(),
            Some("ARCHITECTURE.md#layers")
        );
    }

    #[test]
    fn scope_dep_allows_reverse_direction() {
        let violations = run(&ScopeDepRule::new(make_scope_dep_config()));
        assert!(violations
            .iter()
            .all(|v| v.unit.name != "com.example.infra.JpaOrders"));
    }
}
