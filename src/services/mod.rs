pub mod authentication_service;
pub mod company_service;
pub mod employee_service;
pub mod error;

pub use authentication_service::AuthenticationService;
pub use company_service::CompanyService;
pub use employee_service::EmployeeService;
pub use error::ServiceError;

use crate::config::JwtConfig;
use crate::database::RepositoryManager;

/// Every service, built once over the same repositories.
#[derive(Clone)]
pub struct ServiceManager {
    pub company: CompanyService,
    pub employee: EmployeeService,
    pub authentication: AuthenticationService,
}

impl ServiceManager {
    pub fn new(repository: RepositoryManager, jwt: JwtConfig) -> Self {
        Self {
            company: CompanyService::new(repository.clone()),
            employee: EmployeeService::new(repository.clone()),
            authentication: AuthenticationService::new(repository, jwt),
        }
    }
}
