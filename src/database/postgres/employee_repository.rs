use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::{EmployeeParameters, PagedList};
use crate::database::contracts::EmployeeRepository;
use crate::database::manager::DatabaseError;
use crate::database::models::Employee;
use crate::database::repository::Repository;
use crate::filter::{FilterData, FilterWhereInfo};

pub struct PgEmployeeRepository {
    repository: Repository<Employee>,
}

impl PgEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: Repository::new(Employee::TABLE, pool)
                .with_sortable(Employee::SORTABLE, Employee::DEFAULT_ORDER),
        }
    }
}

/// Conditions shared by the page query and its total count.
pub(crate) fn listing_conditions(company_id: Uuid, parameters: &EmployeeParameters) -> Vec<FilterWhereInfo> {
    let (min_age, max_age) = parameters.age_bounds();
    let mut conditions = vec![
        FilterWhereInfo::eq("company_id", company_id),
        FilterWhereInfo::between("age", min_age, max_age),
    ];
    if let Some(term) = parameters.search_term.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        conditions.push(FilterWhereInfo::contains("name", term));
    }
    conditions
}

#[async_trait]
impl EmployeeRepository for PgEmployeeRepository {
    async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
    ) -> Result<PagedList<Employee>, DatabaseError> {
        let request = &parameters.request;
        let conditions = listing_conditions(company_id, parameters);

        let count = self
            .repository
            .count(FilterData { where_clause: conditions.clone(), ..Default::default() })
            .await?;

        let items = self
            .repository
            .select_any(FilterData {
                where_clause: conditions,
                order: request.order_by.clone(),
                limit: Some(request.page_size as i64),
                offset: Some(request.skip()),
                ..Default::default()
            })
            .await?;

        Ok(PagedList::new(items, count, request.page_number, request.page_size))
    }

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<Option<Employee>, DatabaseError> {
        let filter = FilterData {
            where_clause: vec![FilterWhereInfo::eq("company_id", company_id), FilterWhereInfo::eq("id", id)],
            ..Default::default()
        };
        self.repository.select_one(filter).await
    }

    async fn create_employee_for_company(&self, company_id: Uuid, employee: &Employee) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO employees (id, name, age, position, company_id) VALUES ($1, $2, $3, $4, $5)")
            .bind(employee.id)
            .bind(&employee.name)
            .bind(employee.age)
            .bind(&employee.position)
            .bind(company_id)
            .execute(self.repository.pool())
            .await?;
        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("UPDATE employees SET name = $3, age = $4, position = $5 WHERE id = $1 AND company_id = $2")
                .bind(employee.id)
                .bind(employee.company_id)
                .bind(&employee.name)
                .bind(employee.age)
                .bind(&employee.position)
                .execute(self.repository.pool())
                .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Employee {} not found", employee.id)));
        }
        Ok(())
    }

    async fn delete_employee(&self, employee: &Employee) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM employees WHERE id = $1 AND company_id = $2")
            .bind(employee.id)
            .bind(employee.company_id)
            .execute(self.repository.pool())
            .await?;
        Ok(())
    }
}
