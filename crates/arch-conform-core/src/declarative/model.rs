//! Pure domain model for declarative architecture rules.
//!
//! This module contains no serde and no I/O dependencies.
//! All invariants are enforced at construction time via validated newtypes.

use crate::model::{Annotated, Class};
use crate::packages::{PackagePattern, PatternError};
use crate::types::{Severity, UnitRef, Violation};
use std::collections::BTreeMap;
use std::fmt;

// ────────────────────────────────────────────
// Newtypes with validation
// ────────────────────────────────────────────

/// A validated scope name (non-empty, `[a-z0-9-]` only).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeName(String);

impl ScopeName {
    /// Creates a new scope name.
    ///
    /// # Errors
    ///
    /// Returns error if the name is empty or contains invalid characters.
    pub fn new(name: &str) -> Result<Self, DeclarationError> {
        if name.is_empty() {
            return Err(DeclarationError::EmptyScopeName);
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(DeclarationError::InvalidScopeName {
                name: name.to_string(),
            });
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated simple-name suffix (non-empty identifier characters).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSuffix(String);

impl NameSuffix {
    /// Creates a new suffix.
    ///
    /// # Errors
    ///
    /// Returns error if the suffix is empty or not an identifier fragment.
    pub fn new(suffix: &str) -> Result<Self, DeclarationError> {
        if suffix.is_empty() {
            return Err(DeclarationError::EmptySuffix);
        }
        if !suffix.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(DeclarationError::InvalidSuffix {
                suffix: suffix.to_string(),
            });
        }
        Ok(Self(suffix.to_string()))
    }

    /// Returns the suffix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Compiles a package pattern, mapping the error into the domain error.
///
/// # Errors
///
/// Returns [`DeclarationError::InvalidPattern`].
pub fn package_pattern(pattern: &str) -> Result<PackagePattern, DeclarationError> {
    PackagePattern::new(pattern).map_err(DeclarationError::InvalidPattern)
}

// ────────────────────────────────────────────
// Domain entities
// ────────────────────────────────────────────

/// A named package scope: the packages matched by a set of patterns.
#[derive(Debug, Clone)]
pub struct Scope {
    name: ScopeName,
    patterns: Vec<PackagePattern>,
}

impl Scope {
    /// Creates a new scope.
    #[must_use]
    pub fn new(name: ScopeName, patterns: Vec<PackagePattern>) -> Self {
        Self { name, patterns }
    }

    /// Returns the scope name.
    #[must_use]
    pub fn name(&self) -> &ScopeName {
        &self.name
    }

    /// Returns the package patterns.
    #[must_use]
    pub fn patterns(&self) -> &[PackagePattern] {
        &self.patterns
    }

    /// Tests whether a package belongs to this scope.
    #[must_use]
    pub fn contains(&self, package: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(package))
    }
}

/// Reference to a scope, by name or by inline patterns.
#[derive(Debug, Clone)]
pub enum ScopeRef {
    /// Reference to a named scope defined in `[[scopes]]`.
    Named(ScopeName),
    /// Inline package patterns (no named scope required).
    Inline(Vec<PackagePattern>),
}

impl ScopeRef {
    /// Returns the scope name of a named reference.
    #[must_use]
    pub fn named(&self) -> Option<&ScopeName> {
        match self {
            Self::Named(name) => Some(name),
            Self::Inline(_) => None,
        }
    }
}

/// Message, document reference and severity shared by every declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporting {
    message: String,
    doc_ref: Option<String>,
    severity: Severity,
}

impl Reporting {
    /// Creates the reporting settings of one declaration.
    #[must_use]
    pub fn new(message: impl Into<String>, doc_ref: Option<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            doc_ref,
            severity,
        }
    }

    /// Returns the violation message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Builds a violation as `"{message}: {detail}"`.
    #[must_use]
    pub fn violation(&self, code: &str, rule: &str, unit: UnitRef, detail: &str) -> Violation {
        let violation = Violation::new(
            code,
            rule,
            self.severity,
            unit,
            format!("{}: {detail}", self.message),
        );
        match &self.doc_ref {
            Some(doc) => violation.with_doc_ref(doc),
            None => violation,
        }
    }
}

/// A dependency restriction: classes in a scope must not depend on
/// classes in denied packages.
#[derive(Debug, Clone)]
pub struct RestrictUse {
    name: String,
    scope: ScopeRef,
    deny: Vec<PackagePattern>,
    reporting: Reporting,
}

impl RestrictUse {
    /// Creates a new restrict-use rule.
    #[must_use]
    pub fn new(
        name: String,
        scope: ScopeRef,
        deny: Vec<PackagePattern>,
        reporting: Reporting,
    ) -> Self {
        Self {
            name,
            scope,
            deny,
            reporting,
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope reference.
    #[must_use]
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    /// Returns how violations are reported.
    #[must_use]
    pub fn reporting(&self) -> &Reporting {
        &self.reporting
    }

    /// Tests whether a target package is denied by this rule.
    #[must_use]
    pub fn is_denied(&self, package: &str) -> bool {
        self.deny.iter().any(|p| p.matches(package))
    }
}

/// A naming convention: selected classes end with a suffix.
///
/// Classes are selected by scope, by annotation, or by both.
#[derive(Debug, Clone)]
pub struct NamingConvention {
    name: String,
    scope: Option<ScopeRef>,
    annotation: Option<String>,
    suffix: NameSuffix,
    reporting: Reporting,
}

impl NamingConvention {
    /// Creates a new naming convention.
    ///
    /// # Errors
    ///
    /// Returns [`DeclarationError::MissingSelector`] when neither a scope
    /// nor an annotation selects classes.
    pub fn new(
        name: String,
        scope: Option<ScopeRef>,
        annotation: Option<String>,
        suffix: NameSuffix,
        reporting: Reporting,
    ) -> Result<Self, DeclarationError> {
        if scope.is_none() && annotation.is_none() {
            return Err(DeclarationError::MissingSelector { rule: name });
        }
        Ok(Self {
            name,
            scope,
            annotation,
            suffix,
            reporting,
        })
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the scope reference, if any.
    #[must_use]
    pub fn scope(&self) -> Option<&ScopeRef> {
        self.scope.as_ref()
    }

    /// Returns the selecting annotation, if any.
    #[must_use]
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Returns the required suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        self.suffix.as_str()
    }

    /// Returns how violations are reported.
    #[must_use]
    pub fn reporting(&self) -> &Reporting {
        &self.reporting
    }
}

/// Denies dependencies from classes of one scope on classes of others.
#[derive(Debug, Clone)]
pub struct ScopeDep {
    from: ScopeName,
    to: Vec<ScopeName>,
    reporting: Reporting,
}

impl ScopeDep {
    /// Creates a new scope dependency rule.
    #[must_use]
    pub fn new(from: ScopeName, to: Vec<ScopeName>, reporting: Reporting) -> Self {
        Self {
            from,
            to,
            reporting,
        }
    }

    /// Returns the source scope.
    #[must_use]
    pub fn from_scope(&self) -> &ScopeName {
        &self.from
    }

    /// Returns the denied target scopes.
    #[must_use]
    pub fn denied_targets(&self) -> &[ScopeName] {
        &self.to
    }

    /// Returns how violations are reported.
    #[must_use]
    pub fn reporting(&self) -> &Reporting {
        &self.reporting
    }

    /// Checks if a target scope is denied.
    #[must_use]
    pub fn is_denied(&self, target: &ScopeName) -> bool {
        self.to.contains(target)
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated declarative configuration.
///
/// Every named scope reference resolves to a `[[scopes]]` entry.
#[derive(Debug, Clone, Default)]
pub struct DeclarativeConfig {
    scopes: BTreeMap<ScopeName, Scope>,
    restrict_uses: Vec<RestrictUse>,
    namings: Vec<NamingConvention>,
    scope_deps: Vec<ScopeDep>,
}

impl DeclarativeConfig {
    /// Creates a new declarative config, resolving scope references.
    ///
    /// # Errors
    ///
    /// Returns one [`DeclarationError::UnknownScope`] per reference to an
    /// undefined scope.
    pub fn new(
        scopes: Vec<Scope>,
        restrict_uses: Vec<RestrictUse>,
        namings: Vec<NamingConvention>,
        scope_deps: Vec<ScopeDep>,
    ) -> Result<Self, Vec<DeclarationError>> {
        let scopes: BTreeMap<ScopeName, Scope> =
            scopes.into_iter().map(|s| (s.name.clone(), s)).collect();

        let references = restrict_uses
            .iter()
            .filter_map(|r| Some((format!("restrict-use '{}'", r.name), r.scope.named()?)))
            .chain(
                namings
                    .iter()
                    .filter_map(|n| {
                        let name = n.scope.as_ref()?.named()?;
                        Some((format!("naming '{}'", n.name), name))
                    }),
            )
            .chain(scope_deps.iter().flat_map(|dep| {
                std::iter::once(("deny-scope-dep.from".to_string(), &dep.from)).chain(
                    dep.to.iter().map(move |target| {
                        (format!("deny-scope-dep.to (from '{}')", dep.from), target)
                    }),
                )
            }));

        let errors: Vec<DeclarationError> = references
            .filter(|(_, name)| !scopes.contains_key(*name))
            .map(|(context, name)| DeclarationError::UnknownScope {
                context,
                name: name.clone(),
            })
            .collect();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            scopes,
            restrict_uses,
            namings,
            scope_deps,
        })
    }

    /// Returns true if no declarative rules are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restrict_uses.is_empty() && self.namings.is_empty() && self.scope_deps.is_empty()
    }

    /// Returns all defined scopes.
    #[must_use]
    pub fn scopes(&self) -> &BTreeMap<ScopeName, Scope> {
        &self.scopes
    }

    /// Returns all restrict-use rules.
    #[must_use]
    pub fn restrict_uses(&self) -> &[RestrictUse] {
        &self.restrict_uses
    }

    /// Returns all naming conventions.
    #[must_use]
    pub fn namings(&self) -> &[NamingConvention] {
        &self.namings
    }

    /// Returns all scope dependency rules.
    #[must_use]
    pub fn scope_deps(&self) -> &[ScopeDep] {
        &self.scope_deps
    }

    /// Resolves which scopes a package belongs to, in name order.
    #[must_use]
    pub fn scopes_for_package(&self, package: &str) -> Vec<&ScopeName> {
        self.scopes
            .values()
            .filter(|s| s.contains(package))
            .map(Scope::name)
            .collect()
    }

    /// Tests whether a package is within a scope reference.
    #[must_use]
    pub fn scope_ref_contains(&self, scope_ref: &ScopeRef, package: &str) -> bool {
        match scope_ref {
            ScopeRef::Named(name) => self
                .scopes
                .get(name)
                .is_some_and(|scope| scope.contains(package)),
            ScopeRef::Inline(patterns) => patterns.iter().any(|p| p.matches(package)),
        }
    }

    /// Tests whether a naming convention applies to a class.
    #[must_use]
    pub fn naming_selects(&self, naming: &NamingConvention, class: &Class) -> bool {
        let in_scope = naming
            .scope()
            .map_or(true, |s| self.scope_ref_contains(s, class.package()));
        let annotated = naming
            .annotation()
            .map_or(true, |a| class.is_annotated_with(a));
        in_scope && annotated
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeclarationError {
    /// Scope name is empty.
    #[error("scope name must not be empty")]
    EmptyScopeName,

    /// Scope name contains invalid characters.
    #[error("invalid scope name `{name}`: must be [a-z0-9-]")]
    InvalidScopeName {
        /// The invalid name.
        name: String,
    },

    /// Package pattern is malformed.
    #[error(transparent)]
    InvalidPattern(PatternError),

    /// Suffix is empty.
    #[error("suffix must not be empty")]
    EmptySuffix,

    /// Suffix contains non-identifier characters.
    #[error("invalid suffix `{suffix}`: must be identifier characters")]
    InvalidSuffix {
        /// The invalid suffix.
        suffix: String,
    },

    /// A naming convention selects nothing.
    #[error("naming '{rule}': set `scope`, `packages` or `annotated_with`")]
    MissingSelector {
        /// The rule name.
        rule: String,
    },

    /// A scope reference points to an undefined scope.
    #[error("{context}: unknown scope `{name}`")]
    UnknownScope {
        /// Where the reference was found.
        context: String,
        /// The undefined scope name.
        name: ScopeName,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
