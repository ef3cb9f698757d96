// handlers/mod.rs - route handlers by resource
//
// Public: root document, health, authentication.
// Protected (JWT): companies.
// Employees are nested under a company but do not require a token.

pub mod authentication;
pub mod companies;
pub mod employees;
pub mod root;
