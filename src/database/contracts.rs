use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::{EmployeeParameters, PagedList};
use crate::database::manager::DatabaseError;
use crate::database::models::{Company, Employee, User};
use crate::database::postgres::{PgCompanyRepository, PgEmployeeRepository, PgUserRepository};

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// All companies ordered by name.
    async fn get_all_companies(&self) -> Result<Vec<Company>, DatabaseError>;

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, DatabaseError>;

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DatabaseError>;

    /// Insert the company and its initial employees in one transaction.
    async fn create_company(&self, company: &Company, employees: &[Employee]) -> Result<(), DatabaseError>;

    /// Insert every company with its employees in a single transaction; all or none.
    async fn create_companies(&self, companies: &[(Company, Vec<Employee>)]) -> Result<(), DatabaseError>;

    /// Update the company row and insert any new employees in one transaction.
    async fn update_company(&self, company: &Company, new_employees: &[Employee]) -> Result<(), DatabaseError>;

    /// Delete the company; its employees go with it.
    async fn delete_company(&self, id: Uuid) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// One page of a company's employees after filtering, search and sorting.
    async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, DatabaseError>;

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>, DatabaseError>;

    async fn create_employee_for_company(&self, company_id: Uuid, employee: &Employee) -> Result<(), DatabaseError>;

    async fn update_employee(&self, employee: &Employee) -> Result<(), DatabaseError>;

    async fn delete_employee(&self, employee: &Employee) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    /// Insert the user and link the named roles.
    async fn create_user(&self, user: &User, roles: &[String]) -> Result<(), DatabaseError>;

    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>, DatabaseError>;

    async fn role_exists(&self, name: &str) -> Result<bool, DatabaseError>;

    /// Store a refresh token; `None` keeps the current expiry.
    async fn save_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), DatabaseError>;
}

/// Access point to every repository, shared by the service layer.
#[derive(Clone)]
pub struct RepositoryManager {
    company: Arc<dyn CompanyRepository>,
    employee: Arc<dyn EmployeeRepository>,
    user: Arc<dyn UserRepository>,
}

impl RepositoryManager {
    pub fn new(
        company: Arc<dyn CompanyRepository>,
        employee: Arc<dyn EmployeeRepository>,
        user: Arc<dyn UserRepository>,
    ) -> Self {
        Self { company, employee, user }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgCompanyRepository::new(pool.clone())),
            Arc::new(PgEmployeeRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    pub fn company(&self) -> &dyn CompanyRepository {
        self.company.as_ref()
    }

    pub fn employee(&self) -> &dyn EmployeeRepository {
        self.employee.as_ref()
    }

    pub fn user(&self) -> &dyn UserRepository {
        self.user.as_ref()
    }
}
