mod company_repository;
mod employee_repository;
mod user_repository;

pub use company_repository::PgCompanyRepository;
pub use employee_repository::PgEmployeeRepository;
pub use user_repository::PgUserRepository;
