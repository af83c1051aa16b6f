//! Rule keeping REST controllers away from persistence entities.
//!
//! # Configuration
//!
//! - `entity_packages`: package patterns holding entities (required; falls
//!   back to `[project] entity_packages`)

use crate::names::REST_CONTROLLER;
use crate::options;
use arch_conform_core::model::Class;
use arch_conform_core::packages::PackagePattern;
use arch_conform_core::predicate::{annotated_with, Predicate};
use arch_conform_core::{
    require_list, Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation,
};

/// Rule code for no-rest-controller-entity-access.
pub const CODE: &str = "AC003";

/// Rule name for no-rest-controller-entity-access.
pub const NAME: &str = "no-rest-controller-entity-access";

/// What the rule checks.
pub const DESCRIPTION: &str = "REST controllers must not access entity classes";

/// Forbids accesses from `@RestController` classes into entity packages.
#[derive(Debug, Clone)]
pub struct NoRestControllerEntityAccess {
    controllers: Predicate<Class>,
    entity_packages: Vec<PackagePattern>,
}

impl NoRestControllerEntityAccess {
    /// Creates the rule for the given entity packages.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleConfigError`] if the list is empty, has blank entries,
    /// or holds an invalid pattern.
    pub fn new(entity_packages: &[String]) -> Result<Self, RuleConfigError> {
        let packages = require_list(NAME, "entity_packages", Some(entity_packages.to_vec()))?;
        Ok(Self {
            controllers: annotated_with(REST_CONTROLLER),
            entity_packages: options::patterns(NAME, &packages)?,
        })
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::MissingOption`] when no entity packages are
    /// configured, otherwise see [`NoRestControllerEntityAccess::new`].
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let packages = require_list(
            NAME,
            "entity_packages",
            options::list(
                config,
                NAME,
                "entity_packages",
                config.project.entity_packages.as_ref(),
            ),
        )?;
        Self::new(&packages)
    }
}

impl Rule for NoRestControllerEntityAccess {
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
        let model = ctx.model();
        ctx.accesses()
            .filter(|edge| {
                model
                    .class(&edge.origin)
                    .is_some_and(|c| self.controllers.test(c))
            })
            .filter(|edge| {
                let package = edge.target_package();
                self.entity_packages.iter().any(|p| p.matches(package))
            })
            .map(|edge| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::class_named(&edge.origin),
                    format!("REST controller accesses entity class: {}", edge.describe()),
                )
                .with_help("map entities to DTOs in a service and return those")
            })
            .collect()
    }
}
