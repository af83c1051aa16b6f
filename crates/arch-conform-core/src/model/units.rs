//! Code units: classes, their members, and access edges as supplied by
//! the model provider.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Declared modifier on a class or member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `static`
    Static,
    /// `final`
    Final,
    /// `abstract`
    Abstract,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Static => "static",
            Self::Final => "final",
            Self::Abstract => "abstract",
        };
        f.write_str(s)
    }
}

/// An annotation attached to a class or member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Qualified annotation type name (e.g. `javax.persistence.Entity`).
    pub name: String,
    /// Annotation parameters rendered as strings.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Annotation {
    /// Creates an annotation without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Returns a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// A (possibly parameterized) type reference such as `Page<UserDto>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Qualified raw type name.
    pub name: String,
    /// Generic type arguments, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// Creates a raw (non-generic) type reference.
    #[must_use]
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a parameterized type reference.
    #[must_use]
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Returns `true` if the raw type equals `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Renders the full type name including generic arguments,
    /// e.g. `org.springframework.data.domain.Page<com.example.UserDto>`.
    #[must_use]
    pub fn type_name(&self) -> String {
        if self.args.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.args.iter().map(TypeRef::type_name).collect();
        format!("{}<{}>", self.name, args.join(", "))
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::raw("void")
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// Units that carry annotations.
pub trait Annotated {
    /// Returns the annotations of this unit.
    fn annotations(&self) -> &[Annotation];

    /// Returns `true` if an annotation with the given qualified name is present.
    fn is_annotated_with(&self, name: &str) -> bool {
        self.annotations().iter().any(|a| a.name == name)
    }

    /// Returns the annotation with the given qualified name.
    fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations().iter().find(|a| a.name == name)
    }
}

/// Units that carry modifiers.
pub trait HasModifiers {
    /// Returns the declared modifiers.
    fn modifiers(&self) -> &BTreeSet<Modifier>;

    /// Returns `true` if the modifier is declared.
    fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers().contains(&modifier)
    }
}

/// Kind of type declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Plain class.
    #[default]
    Class,
    /// Interface.
    Interface,
    /// Enum.
    Enum,
    /// Annotation type.
    Annotation,
    /// Record.
    Record,
}

/// Source set a class was compiled from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSet {
    /// Production code.
    #[default]
    Main,
    /// Test code.
    Test,
}

/// A field declared by a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Declared field type.
    #[serde(rename = "type")]
    pub field_type: TypeRef,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    /// Annotations on the field.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    pub(crate) owner: String,
}

impl Field {
    /// Creates a field with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            owner: String::new(),
        }
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Qualified name of the declaring class.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Full name, e.g. `com.example.Foo.logger`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

impl Annotated for Field {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for Field {
    fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }
}

/// A method declared by a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Declared return type (`void` when absent).
    #[serde(default)]
    pub return_type: TypeRef,
    /// Parameter types in declaration order.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    /// Annotations on the method.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    pub(crate) owner: String,
}

impl Method {
    /// Creates a method with the given name and return type.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            return_type,
            parameters: Vec::new(),
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            owner: String::new(),
        }
    }

    /// Adds a parameter type.
    #[must_use]
    pub fn with_parameter(mut self, parameter: TypeRef) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Qualified name of the declaring class.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Full name, e.g. `com.example.Foo.bar(java.lang.String)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{}.{}({})",
            self.owner,
            self.name,
            join_raw_names(&self.parameters)
        )
    }
}

impl Annotated for Method {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for Method {
    fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }
}

/// A constructor declared by a class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
    /// Parameter types in declaration order.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    /// Annotations on the constructor.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    pub(crate) owner: String,
}

impl Constructor {
    /// Creates a constructor without parameters or modifiers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter type.
    #[must_use]
    pub fn with_parameter(mut self, parameter: TypeRef) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Qualified name of the declaring class.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Full name, e.g. `com.example.Foo.<init>(int, int)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.<init>({})", self.owner, join_raw_names(&self.parameters))
    }
}

impl Annotated for Constructor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for Constructor {
    fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }
}

fn join_raw_names(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A type declaration from the analysed codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    /// Qualified name (`$` separates nested types).
    pub name: String,
    /// Kind of declaration.
    #[serde(default)]
    pub kind: ClassKind,
    /// Declared modifiers.
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,
    /// Annotations on the class.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Direct superclass, if any.
    #[serde(default)]
    pub superclass: Option<String>,
    /// Directly implemented interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Transitive supertypes. Provider-supplied entries are kept and
    /// closed over the classes of the model when it is built.
    #[serde(default)]
    pub supertypes: BTreeSet<String>,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Declared methods.
    #[serde(default)]
    pub methods: Vec<Method>,
    /// Declared constructors.
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    /// Source set the class belongs to.
    #[serde(default)]
    pub source: SourceSet,
}

impl Class {
    /// Creates an empty class with the given qualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: BTreeSet::new(),
            annotations: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            supertypes: BTreeSet::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            source: SourceSet::Main,
        }
    }

    /// Sets the declaration kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds a modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Adds an annotation by qualified name.
    #[must_use]
    pub fn annotated(mut self, name: impl Into<String>) -> Self {
        self.annotations.push(Annotation::new(name));
        self
    }

    /// Sets the direct superclass.
    #[must_use]
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Adds a directly implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a constructor.
    #[must_use]
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Marks the class as test code.
    #[must_use]
    pub fn in_tests(mut self) -> Self {
        self.source = SourceSet::Test;
        self
    }

    /// Package the class resides in (empty for the default package).
    #[must_use]
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }

    /// Simple name, without package and enclosing types.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        let local = self
            .name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(_, n)| n);
        local.rsplit_once('$').map_or(local, |(_, n)| n)
    }

    /// Returns `true` if values of this class can be assigned to `name`.
    #[must_use]
    pub fn is_assignable_to(&self, name: &str) -> bool {
        self.name == name || self.supertypes.contains(name)
    }

    /// Direct supertypes: superclass, interfaces and provider-supplied entries.
    pub(crate) fn direct_supertypes(&self) -> impl Iterator<Item = &String> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .chain(self.supertypes.iter())
    }

    pub(crate) fn assign_owners(&mut self) {
        for field in &mut self.fields {
            field.owner.clone_from(&self.name);
        }
        for method in &mut self.methods {
            method.owner.clone_from(&self.name);
        }
        for constructor in &mut self.constructors {
            constructor.owner.clone_from(&self.name);
        }
    }
}

impl Annotated for Class {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

impl HasModifiers for Class {
    fn modifiers(&self) -> &BTreeSet<Modifier> {
        &self.modifiers
    }
}

/// Returns the package portion of a qualified class name.
#[must_use]
pub fn package_of(qualified_name: &str) -> &str {
    qualified_name.rsplit_once('.').map_or("", |(p, _)| p)
}

/// Kind of access from one class to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessKind {
    /// Field read.
    FieldGet,
    /// Field write.
    FieldSet,
    /// Method invocation.
    MethodCall,
    /// Constructor invocation.
    ConstructorCall,
    /// Type reference in a signature, cast, or annotation.
    TypeReference,
}

impl AccessKind {
    /// Returns `true` for field and call accesses. Type references are
    /// dependencies but not accesses.
    #[must_use]
    pub fn is_access(self) -> bool {
        !matches!(self, Self::TypeReference)
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FieldGet => "reads field of",
            Self::FieldSet => "writes field of",
            Self::MethodCall => "calls method of",
            Self::ConstructorCall => "constructs",
            Self::TypeReference => "references",
        };
        f.write_str(s)
    }
}

/// A directed "origin accesses target" relation between two classes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccessEdge {
    /// Qualified name of the accessing class.
    pub origin: String,
    /// Qualified name of the accessed class.
    pub target: String,
    /// Kind of access.
    pub kind: AccessKind,
    /// Accessing member, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_member: Option<String>,
    /// Accessed member, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_member: Option<String>,
    /// Source line of the access, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl AccessEdge {
    /// Creates an access edge.
    #[must_use]
    pub fn new(origin: impl Into<String>, target: impl Into<String>, kind: AccessKind) -> Self {
        Self {
            origin: origin.into(),
            target: target.into(),
            kind,
            origin_member: None,
            target_member: None,
            line: None,
        }
    }

    /// Package of the target class.
    #[must_use]
    pub fn target_package(&self) -> &str {
        package_of(&self.target)
    }

    /// Renders the edge for messages, e.g. `A.run() calls method of B.save`.
    #[must_use]
    pub fn describe(&self) -> String {
        let origin = match &self.origin_member {
            Some(m) => format!("{}.{m}", self.origin),
            None => self.origin.clone(),
        };
        let target = match &self.target_member {
            Some(m) => format!("{}.{m}", self.target),
            None => self.target.clone(),
        };
        match self.line {
            Some(line) => format!("{origin} {} {target} (line {line})", self.kind),
            None => format!("{origin} {} {target}", self.kind),
        }
    }
}
