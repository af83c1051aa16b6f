//! Rule limiting constructor parameter lists outside managed components.
//!
//! # Configuration
//!
//! - `max_parameters`: largest allowed parameter count (default: 3)
//! - `managed_annotations`: qualified annotation names marking managed
//!   components, whose constructors are exempt (default: the Spring
//!   stereotypes and `@ConfigurationProperties`)

use crate::names::MANAGED_COMPONENTS;
use crate::options;
use arch_conform_core::model::{Class, HasModifiers, Modifier};
use arch_conform_core::predicate::{annotated_with_any, Predicate};
use arch_conform_core::{
    list_or_default, Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation,
};

/// Rule code for constructor-arity.
pub const CODE: &str = "AC017";

/// Rule name for constructor-arity.
pub const NAME: &str = "constructor-arity";

/// What the rule checks.
pub const DESCRIPTION: &str = "Public constructors of plain classes take at most 3 parameters";

/// Default parameter limit.
pub const DEFAULT_MAX_PARAMETERS: usize = 3;

/// Flags long public constructors on classes that are not Spring-managed.
#[derive(Debug, Clone)]
pub struct ConstructorArity {
    managed: Predicate<Class>,
    max_parameters: usize,
}

impl Default for ConstructorArity {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstructorArity {
    /// Creates the rule with a limit of three parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            managed: annotated_with_any(MANAGED_COMPONENTS),
            max_parameters: DEFAULT_MAX_PARAMETERS,
        }
    }

    /// Replaces the annotations that mark managed components.
    #[must_use]
    pub fn managed_annotations(mut self, annotations: &[&str]) -> Self {
        self.managed = annotated_with_any(annotations);
        self
    }

    /// Sets the parameter limit.
    #[must_use]
    pub fn max_parameters(mut self, max: usize) -> Self {
        self.max_parameters = max;
        self
    }

    /// Creates the rule from `[rules.constructor-arity]`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidOption`] if `max_parameters` is not a
    /// non-negative integer, and [`RuleConfigError::EmptyList`] or
    /// [`RuleConfigError::BlankEntry`] for an unusable `managed_annotations`.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let max = options::count(config, NAME, "max_parameters", DEFAULT_MAX_PARAMETERS)?;
        let annotations = list_or_default(
            NAME,
            "managed_annotations",
            options::list(config, NAME, "managed_annotations", None),
            MANAGED_COMPONENTS,
        )?;
        let annotations: Vec<&str> = annotations.iter().map(String::as_str).collect();
        Ok(Self::new().managed_annotations(&annotations).max_parameters(max))
    }
}

impl Rule for ConstructorArity {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn check(&self, ctx: &EvaluationContext<'_>) -> Vec<Violation> {
        ctx.classes()
            .filter(|c| !self.managed.test(c))
            .flat_map(|c| c.constructors.iter())
            .filter(|ctor| {
                ctor.has_modifier(Modifier::Public) && ctor.parameters.len() > self.max_parameters
            })
            .map(|ctor| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::constructor(ctor),
                    format!(
                        "Constructor {} of class {} has more than {} parameters. \
                         Prefer Builder over long list constructors",
                        ctor.full_name(),
                        ctor.owner(),
                        self.max_parameters
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::SERVICE;
    use crate::testing::{check, units};
    use arch_conform_core::model::{CodeModel, Constructor, TypeRef};

    fn constructor(arity: usize) -> Constructor {
        (0..arity).fold(Constructor::new().with_modifier(Modifier::Public), |c, _| {
            c.with_parameter(TypeRef::raw("java.lang.String"))
        })
    }

    #[test]
    fn test_detects_long_constructor_on_plain_class() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.Address").with_constructor(constructor(4)))
            .class(Class::new("com.example.Point").with_constructor(constructor(3)))
            .class(
                Class::new("com.example.UserService")
                    .annotated(SERVICE)
                    .with_constructor(constructor(5)),
            )
            .build()
            .unwrap();

        let violations = check(&ConstructorArity::new(), &model);
        assert_eq!(
            units(&violations),
            vec!["com.example.Address.<init>(java.lang.String, java.lang.String, java.lang.String, java.lang.String)"]
        );
        assert!(violations[0]
            .message
            .ends_with("of class com.example.Address has more than 3 parameters. Prefer Builder over long list constructors"));
    }

    #[test]
    fn test_private_constructors_are_ignored() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.Address").with_constructor(
                (0..5).fold(Constructor::new().with_modifier(Modifier::Private), |c, _| {
                    c.with_parameter(TypeRef::raw("int"))
                }),
            ))
            .build()
            .unwrap();

        assert!(check(&ConstructorArity::new(), &model).is_empty());
    }

    #[test]
    fn test_configured_limit() {
        let config = Config::parse("[rules.constructor-arity]\nmax_parameters = 5\n").unwrap();
        let model = CodeModel::builder()
            .class(Class::new("com.example.Address").with_constructor(constructor(4)))
            .build()
            .unwrap();

        assert!(check(&ConstructorArity::from_config(&config).unwrap(), &model).is_empty());

        let invalid =
            Config::parse("[rules.constructor-arity]\nmax_parameters = \"many\"\n").unwrap();
        assert!(matches!(
            ConstructorArity::from_config(&invalid),
            Err(RuleConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_configured_managed_annotations() {
        let config = Config::parse(
            "[rules.constructor-arity]\nmanaged_annotations = [\"javax.inject.Named\"]\n",
        )
        .unwrap();
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.Mailer")
                    .annotated("javax.inject.Named")
                    .with_constructor(constructor(4)),
            )
            .class(
                Class::new("com.example.UserService")
                    .annotated(SERVICE)
                    .with_constructor(constructor(4)),
            )
            .build()
            .unwrap();

        let violations = check(&ConstructorArity::from_config(&config).unwrap(), &model);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].unit.name.starts_with("com.example.UserService.<init>"));

        let empty =
            Config::parse("[rules.constructor-arity]\nmanaged_annotations = []\n").unwrap();
        assert!(matches!(
            ConstructorArity::from_config(&empty),
            Err(RuleConfigError::EmptyList { .. })
        ));
    }
}
