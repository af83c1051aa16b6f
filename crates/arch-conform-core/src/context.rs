//! Context types for rule evaluation.

use crate::model::{AccessEdge, Class, CodeModel, Constructor, Field, Method, SourceSet};
use crate::packages::{is_within, PackagePattern};

/// Which classes of the model rules look at.
///
/// Mirrors how the model was imported: only classes below the root
/// packages, minus excluded package patterns, minus test classes unless
/// requested.
#[derive(Debug, Clone, Default)]
pub struct ModelScope {
    packages: Vec<String>,
    exclude: Vec<PackagePattern>,
    include_tests: bool,
}

impl ModelScope {
    /// A scope that includes every class, test classes included.
    #[must_use]
    pub fn everything() -> Self {
        Self {
            packages: Vec::new(),
            exclude: Vec::new(),
            include_tests: true,
        }
    }

    /// Restricts the scope to classes within the given root packages.
    #[must_use]
    pub fn with_packages(mut self, packages: Vec<String>) -> Self {
        self.packages = packages;
        self
    }

    /// Excludes classes in packages matching any of the patterns.
    #[must_use]
    pub fn with_exclusions(mut self, exclude: Vec<PackagePattern>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Includes or excludes test classes.
    #[must_use]
    pub fn with_tests(mut self, include_tests: bool) -> Self {
        self.include_tests = include_tests;
        self
    }

    /// Returns `true` if the class is in scope.
    #[must_use]
    pub fn includes(&self, class: &Class) -> bool {
        if !self.include_tests && class.source == SourceSet::Test {
            return false;
        }
        let package = class.package();
        if !self.packages.is_empty() && !self.packages.iter().any(|p| is_within(package, p)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(package))
    }
}

/// Context provided to rules: the model restricted to a scope.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    model: &'a CodeModel,
    scope: &'a ModelScope,
}

impl<'a> EvaluationContext<'a> {
    /// Creates a new evaluation context.
    #[must_use]
    pub fn new(model: &'a CodeModel, scope: &'a ModelScope) -> Self {
        Self { model, scope }
    }

    /// The full, unfiltered model.
    #[must_use]
    pub fn model(&self) -> &'a CodeModel {
        self.model
    }

    /// Classes in scope, ordered by qualified name.
    pub fn classes(&self) -> impl Iterator<Item = &'a Class> + 'a {
        let scope = self.scope;
        self.model.classes().filter(move |c| scope.includes(c))
    }

    /// Returns `true` if the named class exists and is in scope.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.model
            .class(name)
            .is_some_and(|c| self.scope.includes(c))
    }

    /// All dependencies (accesses and type references) originating from
    /// classes in scope.
    pub fn dependencies(&self) -> impl Iterator<Item = &'a AccessEdge> + 'a {
        let this = *self;
        self.model
            .accesses()
            .iter()
            .filter(move |e| this.contains(&e.origin))
    }

    /// Field and call accesses originating from classes in scope.
    pub fn accesses(&self) -> impl Iterator<Item = &'a AccessEdge> + 'a {
        self.dependencies().filter(|e| e.kind.is_access())
    }

    /// Methods declared by classes in scope.
    pub fn methods(&self) -> impl Iterator<Item = &'a Method> + 'a {
        self.classes().flat_map(|c| c.methods.iter())
    }

    /// Fields declared by classes in scope.
    pub fn fields(&self) -> impl Iterator<Item = &'a Field> + 'a {
        self.classes().flat_map(|c| c.fields.iter())
    }

    /// Constructors declared by classes in scope.
    pub fn constructors(&self) -> impl Iterator<Item = &'a Constructor> + 'a {
        self.classes().flat_map(|c| c.constructors.iter())
    }

    /// Number of classes in scope.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes().count()
    }
}
