//! In-memory repositories and fixtures for tests that run without Postgres.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::{uuid, Uuid};

use crate::api::{EmployeeParameters, PagedList};
use crate::auth::{generate_jwt, Claims};
use crate::config::{AppConfig, JwtConfig};
use crate::database::models::{Company, Employee, User};
use crate::database::{CompanyRepository, DatabaseError, EmployeeRepository, RepositoryManager, UserRepository};
use crate::filter::{FilterOrder, FilterOrderInfo, SortDirection};
use crate::state::AppState;

pub const IT_SOLUTIONS_ID: Uuid = uuid!("c9d4c053-49b6-410c-bc78-2d54a9991870");
pub const ADMIN_SOLUTIONS_ID: Uuid = uuid!("3d490a70-94ce-4d15-9494-5248280c2ce3");
pub const SAM_RAIDEN_ID: Uuid = uuid!("80abbca8-664d-4b20-b5de-024705497d4a");
pub const JANA_MCLEAF_ID: Uuid = uuid!("86dba8c0-d178-41e7-938c-ed49778fb52a");
pub const KANE_MILLER_ID: Uuid = uuid!("021ca3c1-0deb-4afd-ae94-2159a8479811");

const ROLES: &[&str] = &["Manager", "Administrator"];

#[derive(Default)]
struct Store {
    companies: Vec<Company>,
    employees: Vec<Employee>,
    users: Vec<User>,
    user_roles: Vec<(Uuid, String)>,
}

/// Implements every repository trait over one shared in-memory store.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryRepository {
    /// Companies and employees matching the initial migration.
    pub fn seeded() -> Self {
        let store = Store {
            companies: vec![
                Company {
                    id: IT_SOLUTIONS_ID,
                    name: "IT_Solutions Ltd".into(),
                    address: "583 Wall Dr. Gwynn Oak, MD 21207".into(),
                    country: Some("USA".into()),
                },
                Company {
                    id: ADMIN_SOLUTIONS_ID,
                    name: "Admin_Solutions Ltd".into(),
                    address: "312 Forest Avenue, BF 923".into(),
                    country: Some("USA".into()),
                },
            ],
            employees: vec![
                employee(SAM_RAIDEN_ID, "Sam Raiden", 26, "Software developer", IT_SOLUTIONS_ID),
                employee(JANA_MCLEAF_ID, "Jana McLeaf", 30, "Software developer", IT_SOLUTIONS_ID),
                employee(KANE_MILLER_ID, "Kane Miller", 35, "Administrator", ADMIN_SOLUTIONS_ID),
            ],
            ..Default::default()
        };
        Self { store: Arc::new(RwLock::new(store)) }
    }

    pub fn manager(&self) -> RepositoryManager {
        RepositoryManager::new(Arc::new(self.clone()), Arc::new(self.clone()), Arc::new(self.clone()))
    }
}

fn employee(id: Uuid, name: &str, age: i32, position: &str, company_id: Uuid) -> Employee {
    Employee { id, name: name.into(), age, position: position.into(), company_id }
}

pub fn seeded_repositories() -> RepositoryManager {
    InMemoryRepository::seeded().manager()
}

pub fn test_jwt_config() -> JwtConfig {
    let mut jwt = AppConfig::development().security.jwt;
    jwt.secret = "in-memory-test-secret-0123456789".into();
    jwt
}

/// Application state over a seeded in-memory store, without rate limiting.
pub fn test_state() -> AppState {
    let mut config = AppConfig::development();
    config.security.jwt = test_jwt_config();
    config.api.enable_rate_limiting = false;
    AppState::new(config, seeded_repositories(), None)
}

/// `Authorization` header value for a user holding `roles`.
pub fn bearer_token(roles: &[&str]) -> String {
    let jwt = test_jwt_config();
    let claims = Claims::new("JDoe", roles.iter().map(|r| r.to_string()).collect(), &jwt);
    format!("Bearer {}", generate_jwt(&claims, &jwt).unwrap())
}

fn compare_employees(a: &Employee, b: &Employee, order: &[FilterOrderInfo]) -> Ordering {
    for info in order {
        let ordering = match info.column.as_str() {
            "id" => a.id.cmp(&b.id),
            "name" => a.name.cmp(&b.name),
            "age" => a.age.cmp(&b.age),
            "position" => a.position.cmp(&b.position),
            "company_id" => a.company_id.cmp(&b.company_id),
            _ => Ordering::Equal,
        };
        let ordering = if info.sort == SortDirection::Desc { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait]
impl CompanyRepository for InMemoryRepository {
    async fn get_all_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let mut companies = self.store.read().await.companies.clone();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, DatabaseError> {
        Ok(self.store.read().await.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DatabaseError> {
        Ok(self.store.read().await.companies.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn create_company(&self, company: &Company, employees: &[Employee]) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        if store.companies.iter().any(|c| c.id == company.id) {
            return Err(DatabaseError::Conflict(format!("Company {} already exists", company.id)));
        }
        store.companies.push(company.clone());
        store.employees.extend(employees.iter().cloned());
        Ok(())
    }

    async fn create_companies(&self, companies: &[(Company, Vec<Employee>)]) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        for (index, (company, _)) in companies.iter().enumerate() {
            let taken = store.companies.iter().any(|c| c.id == company.id)
                || companies[..index].iter().any(|(earlier, _)| earlier.id == company.id);
            if taken {
                return Err(DatabaseError::Conflict(format!("Company {} already exists", company.id)));
            }
        }
        for (company, employees) in companies {
            store.companies.push(company.clone());
            store.employees.extend(employees.iter().cloned());
        }
        Ok(())
    }

    async fn update_company(&self, company: &Company, new_employees: &[Employee]) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        let existing = store
            .companies
            .iter_mut()
            .find(|c| c.id == company.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Company {} not found", company.id)))?;
        *existing = company.clone();
        store.employees.extend(new_employees.iter().cloned());
        Ok(())
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        let before = store.companies.len();
        store.companies.retain(|c| c.id != id);
        if store.companies.len() == before {
            return Err(DatabaseError::NotFound(format!("Company {} not found", id)));
        }
        store.employees.retain(|e| e.company_id != id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryRepository {
    async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, DatabaseError> {
        let (min_age, max_age) = parameters.age_bounds();
        let term = parameters.search_term.as_deref().map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty());

        let mut employees: Vec<Employee> = self
            .store
            .read()
            .await
            .employees
            .iter()
            .filter(|e| e.company_id == company_id && e.age >= min_age && e.age <= max_age)
            .filter(|e| term.as_ref().map_or(true, |t| e.name.to_lowercase().contains(t.as_str())))
            .cloned()
            .collect();

        let order = FilterOrder::parse_or_default(
            parameters.request.order_by.as_deref(),
            Employee::SORTABLE,
            Employee::DEFAULT_ORDER,
        );
        employees.sort_by(|a, b| compare_employees(a, b, &order));

        Ok(PagedList::to_paged_list(employees, parameters.request.page_number, parameters.request.page_size))
    }

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        Ok(self
            .store
            .read()
            .await
            .employees
            .iter()
            .find(|e| e.company_id == company_id && e.id == id)
            .cloned())
    }

    async fn create_employee_for_company(&self, company_id: Uuid, employee: &Employee) -> Result<(), DatabaseError> {
        let mut employee = employee.clone();
        employee.company_id = company_id;
        self.store.write().await.employees.push(employee);
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        let existing = store
            .employees
            .iter_mut()
            .find(|e| e.id == employee.id && e.company_id == employee.company_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Employee {} not found", employee.id)))?;
        *existing = employee.clone();
        Ok(())
    }

    async fn delete_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        self.store.write().await.employees.retain(|e| e.id != employee.id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .store
            .read()
            .await
            .users
            .iter()
            .find(|u| u.user_name.eq_ignore_ascii_case(user_name))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .store
            .read()
            .await
            .users
            .iter()
            .find(|u| u.email.as_deref().is_some_and(|e| e.eq_ignore_ascii_case(email)))
            .cloned())
    }

    async fn create_user(&self, user: &User, roles: &[String]) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        if store.users.iter().any(|u| u.user_name.eq_ignore_ascii_case(&user.user_name)) {
            return Err(DatabaseError::Conflict(format!("User '{}' already exists", user.user_name)));
        }
        store.users.push(user.clone());
        for role in roles {
            if let Some(name) = ROLES.iter().find(|r| r.eq_ignore_ascii_case(role)) {
                store.user_roles.push((user.id, name.to_string()));
            }
        }
        Ok(())
    }

    async fn roles_for(&self, user_id: Uuid) -> Result<Vec<String>, DatabaseError> {
        let store = self.store.read().await;
        let mut roles: Vec<String> =
            store.user_roles.iter().filter(|(id, _)| *id == user_id).map(|(_, r)| r.clone()).collect();
        roles.sort();
        Ok(roles)
    }

    async fn role_exists(&self, name: &str) -> Result<bool, DatabaseError> {
        Ok(ROLES.iter().any(|r| r.eq_ignore_ascii_case(name)))
    }

    async fn save_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expiry: Option<DateTime<Utc>>,
    ) -> Result<(), DatabaseError> {
        let mut store = self.store.write().await;
        let user = store
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", user_id)))?;
        user.refresh_token = Some(token.to_string());
        if expiry.is_some() {
            user.refresh_token_expiry_time = expiry;
        }
        Ok(())
    }
}
