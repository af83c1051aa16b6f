//! # arch-conform-rules
//!
//! Built-in conformance rules for Spring applications.
//!
//! Every rule is a pure predicate over a [`CodeModel`](arch_conform_core::model::CodeModel).
//! Rules that need project knowledge (entity packages, DTO suffixes, slice
//! patterns, the root package) read it from `[project]` or their own
//! `[rules.<name>]` section and fail fast when it is missing.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | AC001 | `no-get-api-returns-collection` | GET endpoints must not return `List`/`Set` |
//! | AC002 | `list-endpoint-requires-pagination` | GET endpoints named `*List` return `Page` |
//! | AC003 | `no-rest-controller-entity-access` | REST controllers do not access entities |
//! | AC004 | `rest-controllers-return-dtos` | Paged endpoints return `Page<DTO>` |
//! | AC005 | `rest-controller-name-suffix` | REST controllers end with `Resource` |
//! | AC006 | `entity-version-field` | Entities have exactly one `@Version` field |
//! | AC007 | `no-checked-exceptions` | No class assignable from `Exception` |
//! | AC008 | `services-independent` | Service slices do not depend on each other |
//! | AC009 | `utility-private-constructor` | Utility constructors are private |
//! | AC010 | `utility-not-injected` | Utility classes are not components |
//! | AC011 | `utility-static-methods` | Utility methods are static |
//! | AC012 | `root-package-application-class` | `*Application` lives in the root package |
//! | AC013 | `logger-private-static-final` | Loggers are `private static final` |
//! | AC014 | `repository-in-repository-package` | Repositories live in `..repository..` |
//! | AC015 | `no-field-injection` | No `@Autowired`/`@Inject` fields |
//! | AC016 | `no-legacy-date-time` | No Joda-Time fields |
//! | AC017 | `constructor-arity` | At most 3 constructor parameters outside components |
//! | AC018 | `slices-free-of-cycles` | Layer slices are acyclic |
//! | AC019 | `singleton-final-fields` | Singleton components only have final fields |
//!
//! ## Usage
//!
//! ```ignore
//! use arch_conform_core::{Config, Evaluator};
//! use arch_conform_rules::{NoFieldInjection, Preset};
//!
//! let config = Config::from_file("arch-conform.toml".as_ref())?;
//! let evaluator = Evaluator::builder()
//!     .rules(Preset::from_config(&config)?.rules(&config)?)
//!     .rule(NoFieldInjection::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod constructor_arity;
mod entity_version_field;
mod list_endpoint_requires_pagination;
mod logger_private_static_final;
mod names;
mod no_checked_exceptions;
mod no_field_injection;
mod no_get_api_returns_collection;
mod no_legacy_date_time;
mod no_rest_controller_entity_access;
mod options;
mod presets;
mod repository_in_repository_package;
mod rest_controller_name_suffix;
mod rest_controllers_return_dtos;
mod root_package_application_class;
mod services_independent;
mod singleton_final_fields;
mod slices_free_of_cycles;
mod utility_not_injected;
mod utility_private_constructor;
mod utility_static_methods;

#[cfg(test)]
mod testing;

pub use catalog::{build_rule, build_rules, descriptor, RuleDescriptor, CATALOG};
pub use constructor_arity::ConstructorArity;
pub use entity_version_field::EntityVersionField;
pub use list_endpoint_requires_pagination::ListEndpointRequiresPagination;
pub use logger_private_static_final::LoggerPrivateStaticFinal;
pub use no_checked_exceptions::NoCheckedExceptions;
pub use no_field_injection::NoFieldInjection;
pub use no_get_api_returns_collection::NoGetApiReturnsCollection;
pub use no_legacy_date_time::NoLegacyDateTime;
pub use no_rest_controller_entity_access::NoRestControllerEntityAccess;
pub use presets::Preset;
pub use repository_in_repository_package::RepositoryInRepositoryPackage;
pub use rest_controller_name_suffix::RestControllerNameSuffix;
pub use rest_controllers_return_dtos::RestControllersReturnDtos;
pub use root_package_application_class::RootPackageApplicationClass;
pub use services_independent::ServicesIndependent;
pub use singleton_final_fields::SingletonFinalFields;
pub use slices_free_of_cycles::SlicesFreeOfCycles;
pub use utility_not_injected::UtilityNotInjected;
pub use utility_private_constructor::UtilityPrivateConstructor;
pub use utility_static_methods::UtilityStaticMethods;

/// Re-export core types for convenience.
pub use arch_conform_core::{Rule, Severity, Violation};
