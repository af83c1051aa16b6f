//! The rule catalog: every built-in rule with its factory.
//!
//! Factories validate their configuration eagerly, so a bad option fails
//! before any rule runs.

use crate::{
    constructor_arity, entity_version_field, list_endpoint_requires_pagination,
    logger_private_static_final, no_checked_exceptions, no_field_injection,
    no_get_api_returns_collection, no_legacy_date_time, no_rest_controller_entity_access,
    repository_in_repository_package, rest_controller_name_suffix, rest_controllers_return_dtos,
    root_package_application_class, services_independent, singleton_final_fields,
    slices_free_of_cycles, utility_not_injected, utility_private_constructor,
    utility_static_methods,
};
use arch_conform_core::{Config, RuleBox, RuleConfigError};

type Factory = fn(&Config) -> Result<RuleBox, RuleConfigError>;

/// A catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    /// Rule code (e.g., "AC001").
    pub code: &'static str,
    /// Kebab-case rule name.
    pub name: &'static str,
    /// What the rule checks.
    pub description: &'static str,
    /// Whether the rule needs project options such as entity packages.
    pub requires_config: bool,
    build: Factory,
}

impl RuleDescriptor {
    /// Builds the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleConfigError`] if the rule's options are missing or invalid.
    pub fn build(&self, config: &Config) -> Result<RuleBox, RuleConfigError> {
        (self.build)(config)
    }
}

macro_rules! entry {
    ($module:ident, $requires_config:expr, $build:expr) => {
        RuleDescriptor {
            code: $module::CODE,
            name: $module::NAME,
            description: $module::DESCRIPTION,
            requires_config: $requires_config,
            build: $build,
        }
    };
}

/// Every built-in rule, in code order.
pub static CATALOG: &[RuleDescriptor] = &[
    entry!(no_get_api_returns_collection, false, |_| Ok(Box::new(
        crate::NoGetApiReturnsCollection::new()
    ))),
    entry!(list_endpoint_requires_pagination, false, |config| Ok(
        Box::new(crate::ListEndpointRequiresPagination::from_config(config)?)
    )),
    entry!(no_rest_controller_entity_access, true, |config| Ok(Box::new(
        crate::NoRestControllerEntityAccess::from_config(config)?
    ))),
    entry!(rest_controllers_return_dtos, true, |config| Ok(Box::new(
        crate::RestControllersReturnDtos::from_config(config)?
    ))),
    entry!(rest_controller_name_suffix, false, |config| Ok(Box::new(
        crate::RestControllerNameSuffix::from_config(config)?
    ))),
    entry!(entity_version_field, false, |_| Ok(Box::new(
        crate::EntityVersionField::new()
    ))),
    entry!(no_checked_exceptions, false, |config| Ok(Box::new(
        crate::NoCheckedExceptions::from_config(config)?
    ))),
    entry!(services_independent, true, |config| Ok(Box::new(
        crate::ServicesIndependent::from_config(config)?
    ))),
    entry!(utility_private_constructor, false, |config| Ok(Box::new(
        crate::UtilityPrivateConstructor::from_config(config)?
    ))),
    entry!(utility_not_injected, false, |config| Ok(Box::new(
        crate::UtilityNotInjected::from_config(config)?
    ))),
    entry!(utility_static_methods, false, |config| Ok(Box::new(
        crate::UtilityStaticMethods::from_config(config)?
    ))),
    entry!(root_package_application_class, true, |config| Ok(Box::new(
        crate::RootPackageApplicationClass::from_config(config)?
    ))),
    entry!(logger_private_static_final, false, |_| Ok(Box::new(
        crate::LoggerPrivateStaticFinal::new()
    ))),
    entry!(repository_in_repository_package, false, |config| Ok(
        Box::new(crate::RepositoryInRepositoryPackage::from_config(config)?)
    )),
    entry!(no_field_injection, false, |_| Ok(Box::new(
        crate::NoFieldInjection::new()
    ))),
    entry!(no_legacy_date_time, false, |config| Ok(Box::new(
        crate::NoLegacyDateTime::from_config(config)
    ))),
    entry!(constructor_arity, false, |config| Ok(Box::new(
        crate::ConstructorArity::from_config(config)?
    ))),
    entry!(slices_free_of_cycles, true, |config| Ok(Box::new(
        crate::SlicesFreeOfCycles::from_config(config)?
    ))),
    entry!(singleton_final_fields, false, |config| Ok(Box::new(
        crate::SingletonFinalFields::from_config(config)?
    ))),
];

/// Looks up a catalog entry by name or code.
#[must_use]
pub fn descriptor(name_or_code: &str) -> Option<&'static RuleDescriptor> {
    CATALOG
        .iter()
        .find(|d| d.name == name_or_code || d.code.eq_ignore_ascii_case(name_or_code))
}

/// Builds one rule by name or code.
///
/// # Errors
///
/// Returns [`RuleConfigError::UnknownRule`] for names not in the catalog, or
/// the rule's own configuration error.
pub fn build_rule(name: &str, config: &Config) -> Result<RuleBox, RuleConfigError> {
    tracing::debug!(rule = name, "Building catalog rule");
    descriptor(name)
        .ok_or_else(|| RuleConfigError::UnknownRule {
            name: name.to_string(),
        })?
        .build(config)
}

/// Builds several rules, stopping at the first configuration error.
///
/// # Errors
///
/// See [`build_rule`].
pub fn build_rules<S: AsRef<str>>(
    names: &[S],
    config: &Config,
) -> Result<Vec<RuleBox>, RuleConfigError> {
    names
        .iter()
        .map(|name| build_rule(name.as_ref(), config))
        .collect()
}
