pub mod manager;
pub mod query_builder;
pub mod repository;
pub mod models;
pub mod contracts;
pub mod postgres;

pub use contracts::{CompanyRepository, EmployeeRepository, RepositoryManager, UserRepository};
pub use manager::{DatabaseError, DatabaseManager};
