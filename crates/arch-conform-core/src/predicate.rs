//! Composable predicates over code units.
//!
//! Rules select the units they constrain with [`Predicate`]s and combine
//! them with [`Predicate::and`], [`Predicate::or`] and `!`. Every predicate
//! carries a description used in violation messages.

use crate::model::{Annotated, Class, Field, HasModifiers, Method, Modifier};
use crate::packages::PackagePattern;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

type Test<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A described boolean test over `T`.
pub struct Predicate<T: ?Sized> {
    description: String,
    test: Test<T>,
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            description: self.description.clone(),
            test: Arc::clone(&self.test),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.description).finish()
    }
}

impl<T: ?Sized> fmt::Display for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl<T: ?Sized + 'static> Predicate<T> {
    /// Creates a predicate from a description and a test.
    pub fn new(
        description: impl Into<String>,
        test: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            test: Arc::new(test),
        }
    }

    /// Evaluates the predicate.
    #[must_use]
    pub fn test(&self, value: &T) -> bool {
        (self.test)(value)
    }

    /// Description used in messages.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Both predicates hold.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let description = format!("{} and {}", self.description, other.description);
        Self::new(description, move |v| self.test(v) && other.test(v))
    }

    /// Either predicate holds.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let description = format!("{} or {}", self.description, other.description);
        Self::new(description, move |v| self.test(v) || other.test(v))
    }

    /// Replaces the description.
    #[must_use]
    pub fn described_as(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<T: ?Sized + 'static> std::ops::Not for Predicate<T> {
    type Output = Self;

    fn not(self) -> Self {
        let description = format!("not {}", self.description);
        Self::new(description, move |v| !self.test(v))
    }
}

/// Carries any of the given annotations.
pub fn annotated_with_any<T>(names: &[&str]) -> Predicate<T>
where
    T: Annotated + ?Sized + 'static,
{
    let names: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
    let description = format!(
        "annotated with {}",
        names
            .iter()
            .map(|n| format!("@{}", simple(n)))
            .collect::<Vec<_>>()
            .join(" or ")
    );
    Predicate::new(description, move |unit: &T| {
        names.iter().any(|n| unit.is_annotated_with(n))
    })
}

/// Carries the given annotation.
pub fn annotated_with<T>(name: &str) -> Predicate<T>
where
    T: Annotated + ?Sized + 'static,
{
    annotated_with_any(&[name])
}

/// Declares the given modifier.
pub fn has_modifier<T>(modifier: Modifier) -> Predicate<T>
where
    T: HasModifiers + ?Sized + 'static,
{
    Predicate::new(format!("{modifier}"), move |unit: &T| {
        unit.has_modifier(modifier)
    })
}

/// Class simple name ends with any of the suffixes.
#[must_use]
pub fn simple_name_ending_with_any(suffixes: &[String]) -> Predicate<Class> {
    let suffixes = suffixes.to_vec();
    let description = format!("simple name ending with {}", quoted_list(&suffixes));
    Predicate::new(description, move |class: &Class| {
        let name = class.simple_name();
        suffixes.iter().any(|s| name.ends_with(s.as_str()))
    })
}

/// Class qualified name fully matches the regular expression.
#[must_use]
pub fn name_matching(regex: &Regex) -> Predicate<Class> {
    let full = anchored(regex);
    Predicate::new(
        format!("name matching `{}`", regex.as_str()),
        move |class: &Class| full.is_match(&class.name),
    )
}

/// Class resides in a package matching any of the patterns.
#[must_use]
pub fn reside_in_any_package(patterns: &[PackagePattern]) -> Predicate<Class> {
    let patterns = patterns.to_vec();
    let description = format!(
        "residing in {}",
        patterns
            .iter()
            .map(|p| format!("`{p}`"))
            .collect::<Vec<_>>()
            .join(" or ")
    );
    Predicate::new(description, move |class: &Class| {
        let package = class.package();
        patterns.iter().any(|p| p.matches(package))
    })
}

/// Class can be assigned to the given type.
#[must_use]
pub fn assignable_to(name: &str) -> Predicate<Class> {
    let target = name.to_string();
    Predicate::new(format!("assignable to {}", simple(name)), move |class: &Class| {
        class.is_assignable_to(&target)
    })
}

/// The given class can be assigned to the tested class: the tested class
/// is `target` itself or one of its supertypes.
#[must_use]
pub fn assignable_from(target: &Class) -> Predicate<Class> {
    let mut accepted: BTreeSet<String> = target.direct_supertypes().cloned().collect();
    accepted.extend(target.supertypes.iter().cloned());
    accepted.insert(target.name.clone());
    Predicate::new(
        format!("assignable from {}", simple(&target.name)),
        move |class: &Class| accepted.contains(&class.name),
    )
}

/// Method name fully matches the regular expression.
#[must_use]
pub fn method_name_matching(regex: &Regex) -> Predicate<Method> {
    let full = anchored(regex);
    Predicate::new(
        format!("method name matching `{}`", regex.as_str()),
        move |method: &Method| full.is_match(&method.name),
    )
}

/// Method raw return type is one of the given types.
#[must_use]
pub fn raw_return_type_any(names: &[&str]) -> Predicate<Method> {
    let names: Vec<String> = names.iter().map(|n| (*n).to_string()).collect();
    let description = format!("returning {}", names.join(" or "));
    Predicate::new(description, move |method: &Method| {
        names.iter().any(|n| method.return_type.is(n))
    })
}

/// Field raw type satisfies `test` on the type name.
pub fn raw_field_type(
    description: impl Into<String>,
    test: impl Fn(&str) -> bool + Send + Sync + 'static,
) -> Predicate<Field> {
    Predicate::new(description, move |field: &Field| test(&field.field_type.name))
}

fn anchored(regex: &Regex) -> Regex {
    Regex::new(&format!("^(?:{})$", regex.as_str())).unwrap_or_else(|_| regex.clone())
}

fn simple(name: &str) -> &str {
    name.rsplit_once('.').map_or(name, |(_, n)| n)
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("`{s}`"))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeRef;

    const SERVICE: &str = "org.springframework.stereotype.Service";
    const COMPONENT: &str = "org.springframework.stereotype.Component";

    #[test]
    fn combinators_follow_boolean_logic() {
        let service = Class::new("com.example.AppService").annotated(SERVICE);
        let plain = Class::new("com.example.Plain");

        let managed = annotated_with::<Class>(SERVICE).or(annotated_with(COMPONENT));
        assert!(managed.test(&service));
        assert!(!managed.test(&plain));
        assert!((!managed.clone()).test(&plain));

        let named = simple_name_ending_with_any(&["Service".to_string()]);
        assert!(managed.and(named).test(&service));
    }

    #[test]
    fn descriptions_compose() {
        let p = annotated_with::<Class>(SERVICE).or(annotated_with(COMPONENT));
        assert_eq!(p.description(), "annotated with @Service or annotated with @Component");
        assert_eq!((!p).description(), "not annotated with @Service or annotated with @Component");
    }

    #[test]
    fn name_matching_requires_full_match() {
        let regex = Regex::new(".*Repository").unwrap();
        let p = name_matching(&regex);
        assert!(p.test(&Class::new("com.example.repository.UserRepository")));
        assert!(!p.test(&Class::new("com.example.UserRepositoryImpl")));
    }

    #[test]
    fn method_name_matching_list_suffix() {
        let p = method_name_matching(&Regex::new(r"\w*List\b").unwrap());
        assert!(p.test(&Method::new("getUserList", TypeRef::default())));
        assert!(!p.test(&Method::new("getListOfUsers", TypeRef::default())));
    }

    #[test]
    fn modifier_predicate_on_fields() {
        let field = Field::new("log", TypeRef::raw("org.slf4j.Logger"))
            .with_modifier(Modifier::Private)
            .with_modifier(Modifier::Static);
        assert!(has_modifier::<Field>(Modifier::Static).test(&field));
        assert!(!has_modifier::<Field>(Modifier::Final).test(&field));
    }

    #[test]
    fn reside_in_any_package_checks_class_package() {
        let patterns = vec![PackagePattern::new("..repository..").unwrap()];
        let p = reside_in_any_package(&patterns);
        assert!(p.test(&Class::new("com.example.repository.UserRepository")));
        assert!(!p.test(&Class::new("com.example.UserRepository")));
    }

    #[test]
    fn assignable_from_accepts_the_target_and_its_supertypes() {
        let target = Class::new("java.lang.Exception")
            .extends("java.lang.Throwable")
            .implements("java.io.Serializable");
        let p = assignable_from(&target);
        assert_eq!(p.description(), "assignable from Exception");
        assert!(p.test(&Class::new("java.lang.Exception")));
        assert!(p.test(&Class::new("java.lang.Throwable")));
        assert!(p.test(&Class::new("java.io.Serializable")));
        assert!(!p.test(&Class::new("com.example.AppException").extends("java.lang.Exception")));
    }
}
