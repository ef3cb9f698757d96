pub mod company;
pub mod employee;
pub mod user;

pub use company::Company;
pub use employee::Employee;
pub use user::{Role, User};
