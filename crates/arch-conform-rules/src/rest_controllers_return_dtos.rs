//! Rule requiring paged GET endpoints to carry DTO type arguments.
//!
//! # Configuration
//!
//! - `dto_suffixes`: simple-name suffixes marking DTO types (required; falls
//!   back to `[project] dto_suffixes`)

use crate::names::{GET_MAPPING, PAGE};
use crate::options;
use arch_conform_core::model::{Method, TypeRef};
use arch_conform_core::predicate::{annotated_with, raw_return_type_any, Predicate};
use arch_conform_core::{
    require_list, Config, EvaluationContext, Rule, RuleConfigError, UnitRef, Violation,
};

/// Rule code for rest-controllers-return-dtos.
pub const CODE: &str = "AC004";

/// Rule name for rest-controllers-return-dtos.
pub const NAME: &str = "rest-controllers-return-dtos";

/// What the rule checks.
pub const DESCRIPTION: &str = "Paged GET endpoints must return Page<DTO>";

/// Requires every type argument of a returned `Page` to be a DTO.
#[derive(Debug, Clone)]
pub struct RestControllersReturnDtos {
    endpoints: Predicate<Method>,
    dto_suffixes: Vec<String>,
}

impl RestControllersReturnDtos {
    /// Creates the rule for the given DTO suffixes.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleConfigError`] if the list is empty or has blank entries.
    pub fn new(dto_suffixes: &[String]) -> Result<Self, RuleConfigError> {
        Ok(Self {
            endpoints: annotated_with::<Method>(GET_MAPPING).and(raw_return_type_any(&[PAGE])),
            dto_suffixes: require_list(NAME, "dto_suffixes", Some(dto_suffixes.to_vec()))?,
        })
    }

    /// Creates the rule from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RuleConfigError::MissingOption`] when no suffixes are
    /// configured, otherwise see [`RestControllersReturnDtos::new`].
    pub fn from_config(config: &Config) -> Result<Self, RuleConfigError> {
        let suffixes = require_list(
            NAME,
            "dto_suffixes",
            options::list(config, NAME, "dto_suffixes", config.project.dto_suffixes.as_ref()),
        )?;
        Self::new(&suffixes)
    }

    fn is_dto(&self, argument: &TypeRef) -> bool {
        let name = argument.type_name();
        self.dto_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    fn violation(&self, method: &Method, message: String) -> Violation {
        Violation::new(
            CODE,
            NAME,
            self.default_severity(),
            UnitRef::method(method),
            message,
        )
    }
}

impl Rule for RestControllersReturnDtos {
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
        let mut violations = Vec::new();

        for method in ctx.methods().filter(|m| self.endpoints.test(m)) {
            let arguments = &method.return_type.args;
            if arguments.is_empty() {
                violations.push(self.violation(
                    method,
                    "returns a raw Page without a DTO type argument".to_string(),
                ));
                continue;
            }
            for argument in arguments.iter().filter(|a| !self.is_dto(a)) {
                violations.push(self.violation(
                    method,
                    format!(
                        "does not return Page<DTO> object: \
                         type argument `{argument}` does not end with {}",
                        self.dto_suffixes.join(" or ")
                    ),
                ));
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check, units};
    use arch_conform_core::model::{Annotation, Class, CodeModel};

    fn endpoint(name: &str, returns: TypeRef) -> Method {
        Method::new(name, returns).with_annotation(Annotation::new(GET_MAPPING))
    }

    fn rule() -> RestControllersReturnDtos {
        RestControllersReturnDtos::new(&["Dto".to_string()]).unwrap()
    }

    #[test]
    fn test_one_violation_per_failing_argument() {
        let page = TypeRef::generic(
            PAGE,
            vec![
                TypeRef::raw("com.example.web.UserDto"),
                TypeRef::raw("com.example.domain.UserEntity"),
                TypeRef::raw("com.example.domain.Address"),
            ],
        );
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.web.UserResource").with_method(endpoint("getUsers", page)),
            )
            .build()
            .unwrap();

        let violations = check(&rule(), &model);
        assert_eq!(violations.len(), 2);
        assert!(violations[0].message.contains("`com.example.domain.UserEntity`"));
        assert!(violations[1].message.contains("`com.example.domain.Address`"));
    }

    #[test]
    fn test_raw_page_is_one_violation() {
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.web.UserResource")
                    .with_method(endpoint("getUsers", TypeRef::raw(PAGE))),
            )
            .build()
            .unwrap();

        let violations = check(&rule(), &model);
        assert_eq!(units(&violations), vec!["com.example.web.UserResource.getUsers()"]);
    }

    #[test]
    fn test_dto_pages_pass() {
        let page = TypeRef::generic(PAGE, vec![TypeRef::raw("com.example.web.UserDto")]);
        let model = CodeModel::builder()
            .class(
                Class::new("com.example.web.UserResource").with_method(endpoint("getUsers", page)),
            )
            .build()
            .unwrap();

        assert!(check(&rule(), &model).is_empty());
    }

    #[test]
    fn test_empty_suffixes_are_a_configuration_error() {
        assert!(matches!(
            RestControllersReturnDtos::new(&[]),
            Err(RuleConfigError::EmptyList { .. })
        ));
        let config = Config::parse("[project]\ndto_suffixes = [\"Dto\", \"\"]\n").unwrap();
        assert!(matches!(
            RestControllersReturnDtos::from_config(&config),
            Err(RuleConfigError::BlankEntry { index: 1, .. })
        ));
    }
}
