//! Rule forbidding Joda-Time in field types.
//!
//! # Configuration
//!
//! - `namespace`: forbidden package namespace (default: `org.joda`)

use crate::names::JODA_NAMESPACE;
use arch_conform_core::model::Field;
use arch_conform_core::predicate::{raw_field_type, Predicate};
use arch_conform_core::{Config, EvaluationContext, Rule, UnitRef, Violation};

/// Rule code for no-legacy-date-time.
pub const CODE: &str = "AC016";

/// Rule name for no-legacy-date-time.
pub const NAME: &str = "no-legacy-date-time";

/// What the rule checks.
pub const DESCRIPTION: &str = "Fields do not use Joda-Time types";

/// Flags fields whose raw type lives in a legacy date/time namespace.
#[derive(Debug, Clone)]
pub struct NoLegacyDateTime {
    legacy: Predicate<Field>,
}

impl Default for NoLegacyDateTime {
    fn default() -> Self {
        Self::new()
    }
}

impl NoLegacyDateTime {
    /// Creates the rule for the `org.joda` namespace.
    #[must_use]
    pub fn new() -> Self {
        Self::namespace(JODA_NAMESPACE)
    }

    /// Creates the rule for another namespace.
    #[must_use]
    pub fn namespace(namespace: &str) -> Self {
        let ns = namespace.to_string();
        let prefix = format!("{namespace}.");
        Self {
            legacy: raw_field_type(format!("of a type in `{namespace}`"), move |name| {
                name == ns || name.starts_with(&prefix)
            }),
        }
    }

    /// Creates the rule from `[rules.no-legacy-date-time]`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        config
            .rule(NAME)
            .and_then(|r| r.get_str("namespace"))
            .map_or_else(Self::new, Self::namespace)
    }
}

impl Rule for NoLegacyDateTime {
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
        ctx.fields()
            .filter(|f| self.legacy.test(f))
            .map(|f| {
                Violation::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    UnitRef::field(f),
                    format!(
                        "Field {} of class {} is using Joda time. Prefer Java 8 date time API",
                        f.name,
                        f.owner()
                    ),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{Class, CodeModel, TypeRef};

    #[test]
    fn test_detects_joda_fields_only() {
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.domain.Booking")
                    .with_field(Field::new("start", TypeRef::raw("org.joda.time.DateTime")))
                    .with_field(Field::new("end", TypeRef::raw("java.time.Instant")))
                    .with_field(Field::new("note", TypeRef::raw("org.jodatime.Note"))),
            )
            .build()
            .unwrap();

        let violations = check(&NoLegacyDateTime::new(), &model);
        assert_eq!(units(&violations), vec!["com.example.domain.Booking.start"]);
        assert_eq!(
            violations[0].message,
            "Field start of class com.example.domain.Booking is using Joda time. \
             Prefer Java 8 date time API"
        );
    }
}
