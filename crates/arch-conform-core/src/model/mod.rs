//! Immutable code model of the analysed codebase.
//!
//! The model is supplied by an external provider (see [`loader`]) and built
//! once. Building validates name uniqueness, records the owning class of
//! every member, and closes each class's supertype set over the classes
//! present in the model.

pub mod loader;
mod units;

pub use units::{
    package_of, AccessEdge, AccessKind, Annotated, Annotation, Class, ClassKind, Constructor,
    Field, HasModifiers, Method, Modifier, SourceSet, TypeRef,
};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or building the code model.
#[derive(Debug, Error, Diagnostic)]
pub enum ModelError {
    /// Snapshot file could not be read.
    #[error("failed to read model snapshot {path}")]
    #[diagnostic(code(arch_conform::model::io))]
    Io {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot content is not a valid model document.
    #[error("malformed model snapshot {path}: {source}")]
    #[diagnostic(
        code(arch_conform::model::parse),
        help("snapshots are JSON documents with `classes` and `accesses` arrays")
    )]
    Parse {
        /// Snapshot path (`<inline>` for in-memory content).
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot glob pattern is invalid.
    #[error("invalid model path pattern `{pattern}`: {reason}")]
    #[diagnostic(code(arch_conform::model::glob))]
    Glob {
        /// The pattern as written.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No snapshot file matched the configured pattern.
    #[error("no model snapshot matches `{pattern}`")]
    #[diagnostic(
        code(arch_conform::model::not_found),
        help("set [model].path in arch-conform.toml or pass --model")
    )]
    NoSnapshots {
        /// The pattern as written.
        pattern: String,
    },

    /// Two classes share a qualified name.
    #[error("duplicate class `{name}` in code model")]
    #[diagnostic(code(arch_conform::model::duplicate_class))]
    DuplicateClass {
        /// The duplicated qualified name.
        name: String,
    },

    /// A class has an empty name.
    #[error("class with empty name in code model")]
    #[diagnostic(code(arch_conform::model::empty_name))]
    EmptyClassName,
}

/// Serialized form of a model as produced by the provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// All classes of the codebase.
    #[serde(default)]
    pub classes: Vec<Class>,
    /// All access edges between classes.
    #[serde(default)]
    pub accesses: Vec<AccessEdge>,
}

impl ModelSnapshot {
    /// Appends another snapshot.
    pub fn merge(&mut self, other: Self) {
        self.classes.extend(other.classes);
        self.accesses.extend(other.accesses);
    }
}

/// The built, immutable code model.
#[derive(Debug, Clone, Default)]
pub struct CodeModel {
    classes: BTreeMap<String, Class>,
    accesses: Vec<AccessEdge>,
}

impl CodeModel {
    /// Builds a model from classes and access edges.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateClass`] if two classes share a name,
    /// or [`ModelError::EmptyClassName`] for a nameless class.
    pub fn new(classes: Vec<Class>, mut accesses: Vec<AccessEdge>) -> Result<Self, ModelError> {
        let mut by_name = BTreeMap::new();
        for mut class in classes {
            if class.name.is_empty() {
                return Err(ModelError::EmptyClassName);
            }
            if by_name.contains_key(&class.name) {
                return Err(ModelError::DuplicateClass { name: class.name });
            }
            class.assign_owners();
            by_name.insert(class.name.clone(), class);
        }

        let closures: Vec<(String, BTreeSet<String>)> = by_name
            .keys()
            .map(|name| (name.clone(), supertype_closure(&by_name, name)))
            .collect();
        for (name, supertypes) in closures {
            if let Some(class) = by_name.get_mut(&name) {
                class.supertypes = supertypes;
            }
        }

        accesses.sort();
        accesses.dedup();

        tracing::debug!(
            classes = by_name.len(),
            accesses = accesses.len(),
            "Built code model"
        );

        Ok(Self {
            classes: by_name,
            accesses,
        })
    }

    /// Builds a model from a provider snapshot.
    ///
    /// # Errors
    ///
    /// See [`CodeModel::new`].
    pub fn from_snapshot(snapshot: ModelSnapshot) -> Result<Self, ModelError> {
        Self::new(snapshot.classes, snapshot.accesses)
    }

    /// Creates a builder for assembling a model in code.
    #[must_use]
    pub fn builder() -> CodeModelBuilder {
        CodeModelBuilder::default()
    }

    /// All classes, ordered by qualified name.
    pub fn classes(&self) -> impl Iterator<Item = &Class> {
        self.classes.values()
    }

    /// Looks up a class by qualified name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    /// All access edges, sorted.
    #[must_use]
    pub fn accesses(&self) -> &[AccessEdge] {
        &self.accesses
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if the model holds no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Fields declared by `class` and by its superclass chain within the model,
    /// own fields first.
    #[must_use]
    pub fn all_fields<'a>(&'a self, class: &'a Class) -> Vec<&'a Field> {
        let mut fields: Vec<&Field> = class.fields.iter().collect();
        let mut seen = BTreeSet::from([class.name.as_str()]);
        let mut next = class.superclass.as_deref();
        while let Some(name) = next {
            if !seen.insert(name) {
                break;
            }
            let Some(parent) = self.classes.get(name) else {
                break;
            };
            fields.extend(parent.fields.iter());
            next = parent.superclass.as_deref();
        }
        fields
    }
}

fn supertype_closure(classes: &BTreeMap<String, Class>, name: &str) -> BTreeSet<String> {
    let mut closure = BTreeSet::new();
    let mut stack: Vec<&str> = classes
        .get(name)
        .map(|c| c.direct_supertypes().map(String::as_str).collect())
        .unwrap_or_default();
    while let Some(current) = stack.pop() {
        if current == name || !closure.insert(current.to_string()) {
            continue;
        }
        if let Some(class) = classes.get(current) {
            stack.extend(class.direct_supertypes().map(String::as_str));
        }
    }
    closure
}

/// Builder for [`CodeModel`].
#[derive(Debug, Default)]
pub struct CodeModelBuilder {
    snapshot: ModelSnapshot,
}

impl CodeModelBuilder {
    /// Adds a class.
    #[must_use]
    pub fn class(mut self, class: Class) -> Self {
        self.snapshot.classes.push(class);
        self
    }

    /// Adds an access edge.
    #[must_use]
    pub fn access(mut self, edge: AccessEdge) -> Self {
        self.snapshot.accesses.push(edge);
        self
    }

    /// Shorthand for a method-call edge from `origin` to `target`.
    #[must_use]
    pub fn calls(self, origin: &str, target: &str) -> Self {
        self.access(AccessEdge::new(origin, target, AccessKind::MethodCall))
    }

    /// Builds the model.
    ///
    /// # Errors
    ///
    /// See [`CodeModel::new`].
    pub fn build(self) -> Result<CodeModel, ModelError> {
        CodeModel::from_snapshot(self.snapshot)
    }
}
