//! Rule requiring stateless singleton components.
//!
//! Managed singletons are selected as
//! `(@Component or @Service) and not @ConfigurationProperties`, or
//! `@Controller`, `@RestController` or `@Repository`: the
//! `@ConfigurationProperties` exclusion binds to the first two annotations
//! only.
//!
//! # Configuration
//!
//! - `exclusion_applies_to_all`: apply the `@ConfigurationProperties`
//!   exclusion to every stereotype (default: `false`)

use crate::names::{
    COMPONENT, CONFIGURATION_PROPERTIES, CONTROLLER, REPOSITORY, REST_CONTROLLER, SERVICE,
};
use crate::options;
use arch_conform_core::model::{Class, HasModifiers, Modifier};
use arch_conform_core::predicate::{annotated_with, annotated_with_any, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation};

/// Rule code for singleton-final-fields.
pub const CODE: &str = "AC019";

/// Rule name for singleton-final-fields.
pub const NAME: &str = "singleton-final-fields";

/// What the rule checks.
pub const DESCRIPTION: &str = "Singleton components only declare final fields";

/// Requires every field of a managed singleton to be final.
#[derive(Debug, Clone)]
pub struct SingletonFinalFields {
    singletons: Predicate<Class>,
}

impl Default for SingletonFinalFields {
    fn default() -> Self {
        Self::new()
    }
}

impl SingletonFinalFields {
    /// Creates the rule with the default singleton selector.
    #[must_use]
    pub fn new() -> Self {
        let singletons = annotated_with::<Class>(COMPONENT)
            .or(annotated_with(SERVICE))
            .and(!annotated_with(CONFIGURATION_PROPERTIES))
            .or(annotated_with(CONTROLLER))
            .or(annotated_with(REST_CONTROLLER))
            .or(annotated_with(REPOSITORY));
        Self { singletons }
    }

    /// Creates the rule with the `@ConfigurationProperties` exclusion applied
    /// to every stereotype.
    #[must_use]
    pub fn excluding_configuration_properties() -> Self {
        let stereotypes = [COMPONENT, SERVICE, CONTROLLER, REST_CONTROLLER, REPOSITORY];
        let singletons = annotated_with_any::<Class>(&stereotypes)
            .and(!annotated_with(CONFIGURATION_PROPERTIES));
        Self { singletons }
    }

    /// Creates the rule from `[rules.singleton-final-fields]`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::InvalidOption`] if
    /// `exclusion_applies_to_all` is not a boolean.
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        if options::flag(config, NAME, "exclusion_applies_to_all", false)? {
            Ok(Self::excluding_configuration_properties())
        } else {
            Ok(Self::new())
        }
    }
}

impl Rule for SingletonFinalFields {
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
            .filter(|c| self.singletons.test(c))
            .flat_map(|c| c.fields.iter())
            .filter(|f| !f.has_modifier(Modifier::Final))
            .map(|f| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::field(f),
                    "field is not final",
                )
                .with_help(
                    "singletons are shared between requests; \
                     inject state through the constructor",
                )
            })
            .collect()
    }
}
