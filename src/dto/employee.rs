use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::Identifiable;
use crate::database::models::Employee;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub position: String,
}

impl From<&Employee> for EmployeeDto {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name.clone(),
            age: employee.age,
            position: employee.position.clone(),
        }
    }
}

impl Identifiable for EmployeeDto {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForCreationDto {
    #[validate(
        required(message = "Employee name is a required field."),
        length(max = 30, message = "Maximum length for the Name is 30 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Age is required and it can't be lower than 18."),
        range(min = 18, message = "Age is required and it can't be lower than 18.")
    )]
    pub age: Option<i32>,

    #[validate(
        required(message = "Position is a required field."),
        length(max = 20, message = "Maximum length for the Position is 20 characters.")
    )]
    pub position: Option<String>,
}

impl EmployeeForCreationDto {
    /// Build the entity; call only after validation succeeded.
    pub fn into_entity(self, company_id: Uuid) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_default(),
            age: self.age.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            company_id,
        }
    }
}

/// Full replacement of an employee; also the target document of JSON Patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForUpdateDto {
    #[validate(
        required(message = "Employee name is a required field."),
        length(max = 30, message = "Maximum length for the Name is 30 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Age is required and it can't be lower than 18."),
        range(min = 18, message = "Age is required and it can't be lower than 18.")
    )]
    pub age: Option<i32>,

    #[validate(
        required(message = "Position is a required field."),
        length(max = 20, message = "Maximum length for the Position is 20 characters.")
    )]
    pub position: Option<String>,
}

impl EmployeeForUpdateDto {
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(name) = self.name {
            employee.name = name;
        }
        if let Some(age) = self.age {
            employee.age = age;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
    }
}

impl From<&Employee> for EmployeeForUpdateDto {
    fn from(employee: &Employee) -> Self {
        Self {
            name: Some(employee.name.clone()),
            age: Some(employee.age),
            position: Some(employee.position.clone()),
        }
    }
}
