//! Rule requiring optimistic locking on persistence entities.

use crate::names::{JAKARTA_ENTITY, JAKARTA_VERSION, JAVAX_ENTITY, JAVAX_VERSION};
use arch_conform_core::model::{Annotated, Class};
use arch_conform_core::predicate::{annotated_with_any, Predicate};
use arch_conform_core::{EvaluationContext, Rule, UnitRef, Violation};

/// Rule code for entity-version-field.
pub const CODE: &str = "AC006";

/// Rule name for entity-version-field.
pub const NAME: &str = "entity-version-field";

/// What the rule checks.
pub const DESCRIPTION: &str = "Entities declare exactly one @Version field";

/// Requires each `@Entity` to hold exactly one `@Version` field, counting
/// fields inherited from superclasses in the model.
#[derive(Debug, Clone)]
pub struct EntityVersionField {
    entities: Predicate<Class>,
}

impl Default for EntityVersionField {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityVersionField {
    /// Creates the rule for `javax` and `jakarta` persistence annotations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: annotated_with_any(&[JAVAX_ENTITY, JAKARTA_ENTITY]),
        }
    }
}

impl Rule for EntityVersionField {
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
        ctx.classes()
            .filter(|c| self.entities.test(c))
            .filter_map(|entity| {
                let versions = model
                    .all_fields(entity)
                    .into_iter()
                    .filter(|f| {
                        f.is_annotated_with(JAVAX_VERSION) || f.is_annotated_with(JAKARTA_VERSION)
                    })
                    .count();
                let message = match versions {
                    1 => return None,
                    0 => "has no @Version field".to_string(),
                    n => format!("has {n} @Version fields, expected exactly one"),
                };
                Some(
                    Violation::new(
                        CODE,
                        NAME,
                        self.default_severity(),
                        UnitRef::class(entity),
                        message,
                    )
                    .with_help("add a single `@Version` field, e.g. on a shared base entity"),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{Annotation, CodeModel, Field, TypeRef};

    fn version() -> Field {
        Field::new("version", TypeRef::raw("int")).with_annotation(Annotation::new(JAVAX_VERSION))
    }

    #[test]
    fn test_inherited_version_field_counts() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.domain.AbstractEntity").with_field(version()))
            .class(
                Class::new("com.example.domain.UserEntity")
                    .annotated(JAVAX_ENTITY)
                    .extends("com.example.domain.AbstractEntity"),
            )
            .build()
            .unwrap();

        assert!(check(&EntityVersionField::new(), &model).is_empty());
    }

    #[test]
    fn test_detects_missing_and_duplicate_versions() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.domain.Base").with_field(version()))
            .class(Class::new("com.example.domain.Plain").annotated(JAKARTA_ENTITY))
            .class(
                Class::new("com.example.domain.Twice")
                    .annotated(JAVAX_ENTITY)
                    .extends("com.example.domain.Base")
                    .with_field(
                        Field::new("revision", TypeRef::raw("long"))
                            .with_annotation(Annotation::new(JAKARTA_VERSION)),
                    ),
            )
            .build()
            .unwrap();

        let violations = check(&EntityVersionField::new(), &model);
        assert_eq!(
            units(&violations),
            vec!["com.example.domain.Plain", "com.example.domain.Twice"]
        );
        assert_eq!(violations[0].message, "has no @Version field");
        assert_eq!(violations[1].message, "has 2 @Version fields, expected exactly one");
    }

    #[test]
    fn test_ignores_non_entities() {
        let model = CodeModel::builder()
            .class(Class::new("com.example.domain.ValueObject"))
            .build()
            .unwrap();

        assert!(check(&EntityVersionField::new(), &model).is_empty());
    }
}
