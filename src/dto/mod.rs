pub mod company;
pub mod employee;
pub mod user;

use validator::{ValidationErrors, ValidationErrorsKind};

use crate::error::FieldErrors;

pub use company::{CompanyDto, CompanyForCreationDto, CompanyForUpdateDto};
pub use employee::{EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto};
pub use user::{TokenDto, UserForAuthenticationDto, UserForRegistrationDto};

/// Flatten validator output into `{camelCaseField: [messages]}`.
///
/// Nested struct and list errors are keyed by their path, e.g.
/// `employees[0].name`.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    collect_errors(errors, "", &mut out);
    out
}

fn collect_errors(errors: &ValidationErrors, prefix: &str, out: &mut FieldErrors) {
    for (field, kind) in errors.errors() {
        let key = if prefix.is_empty() { camel_case(field) } else { format!("{}.{}", prefix, camel_case(field)) };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = out.entry(key).or_default();
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("The {} field is invalid.", field));
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_errors(inner, &key, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_errors(inner, &format!("{}[{}]", key, index), out);
                }
            }
        }
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn camel_cases_field_names() {
        assert_eq!(camel_case("user_name"), "userName");
        assert_eq!(camel_case("age"), "age");
    }

    #[test]
    fn flattens_field_messages() {
        let dto = EmployeeForCreationDto { name: None, age: Some(12), position: Some("Developer".into()) };
        let errors = field_errors(&dto.validate().unwrap_err());
        assert_eq!(errors["name"], vec!["Employee name is a required field."]);
        assert_eq!(errors["age"], vec!["Age is required and it can't be lower than 18."]);
        assert!(!errors.contains_key("position"));
    }
}
