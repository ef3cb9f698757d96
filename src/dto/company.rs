use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::api::{CsvRows, Identifiable};
use crate::database::models::{Company, Employee};
use crate::dto::employee::EmployeeForCreationDto;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    pub full_address: String,
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self { id: company.id, name: company.name.clone(), full_address: company.full_address() }
    }
}

impl Identifiable for CompanyDto {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl CsvRows for CompanyDto {
    fn write_csv(&self, writer: &mut csv::Writer<Vec<u8>>) -> csv::Result<()> {
        writer.write_record([self.id.to_string().as_str(), self.name.as_str(), self.full_address.as_str()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForCreationDto {
    #[validate(
        required(message = "Company name is a required field."),
        length(max = 60, message = "Maximum length for the Name is 60 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Company address is a required field."),
        length(max = 60, message = "Maximum length for the Address is 60 characters")
    )]
    pub address: Option<String>,

    pub country: Option<String>,

    #[validate(custom = "validate_employees")]
    pub employees: Option<Vec<EmployeeForCreationDto>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForUpdateDto {
    #[validate(
        required(message = "Company name is a required field."),
        length(max = 60, message = "Maximum length for the Name is 60 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Company address is a required field."),
        length(max = 60, message = "Maximum length for the Address is 60 characters")
    )]
    pub address: Option<String>,

    pub country: Option<String>,

    /// Employees to add alongside the update; existing ones are kept.
    #[validate(custom = "validate_employees")]
    pub employees: Option<Vec<EmployeeForCreationDto>>,
}

impl CompanyForCreationDto {
    /// Split into the company row and its initial employees.
    pub fn into_entities(self) -> (Company, Vec<Employee>) {
        let company = Company {
            id: Uuid::new_v4(),
            name: self.name.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            country: self.country,
        };
        let employees = self
            .employees
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.into_entity(company.id))
            .collect();
        (company, employees)
    }
}

impl CompanyForUpdateDto {
    /// Apply the update and return the employees to insert.
    pub fn apply_to(self, company: &mut Company) -> Vec<Employee> {
        if let Some(name) = self.name {
            company.name = name;
        }
        if let Some(address) = self.address {
            company.address = address;
        }
        company.country = self.country;
        self.employees
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.into_entity(company.id))
            .collect()
    }
}

/// Nested employees are validated here and reported under `employees`.
fn validate_employees(employees: &Vec<EmployeeForCreationDto>) -> Result<(), ValidationError> {
    let mut messages = Vec::new();
    for (index, employee) in employees.iter().enumerate() {
        if let Err(errors) = employee.validate() {
            for (field, list) in crate::dto::field_errors(&errors) {
                for message in list {
                    messages.push(format!("employees[{}].{}: {}", index, field, message));
                }
            }
        }
    }

    if messages.is_empty() {
        return Ok(());
    }
    let mut error = ValidationError::new("employees");
    error.message = Some(messages.join(" ").into());
    Err(error)
}
