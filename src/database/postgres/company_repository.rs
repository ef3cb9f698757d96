use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::database::contracts::CompanyRepository;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Company, Employee};
use crate::database::repository::Repository;
use crate::filter::{FilterData, FilterWhereInfo};

pub struct PgCompanyRepository {
    repository: Repository<Company>,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: Repository::new(Company::TABLE, pool).with_sortable(Company::SORTABLE, Company::DEFAULT_ORDER),
        }
    }
}

async fn insert_company(tx: &mut Transaction<'_, Postgres>, company: &Company) -> Result<(), DatabaseError> {
    sqlx::query("INSERT INTO companies (id, name, address, country) VALUES ($1, $2, $3, $4)")
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.address)
        .bind(&company.country)
        .execute(&mut **tx)
        .await
        .map_err(|e| DatabaseManager::map_unique_violation(e, format!("Company {} already exists", company.id)))?;
    Ok(())
}

pub(crate) async fn insert_employees(
    tx: &mut Transaction<'_, Postgres>,
    employees: &[Employee],
) -> Result<(), DatabaseError> {
    for employee in employees {
        sqlx::query("INSERT INTO employees (id, name, age, position, company_id) VALUES ($1, $2, $3, $4, $5)")
            .bind(employee.id)
            .bind(&employee.name)
            .bind(employee.age)
            .bind(&employee.position)
            .bind(employee.company_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn get_all_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        self.repository.select_any(FilterData::default()).await
    }

    async fn get_company(&self, id: Uuid) -> Result<Option<Company>, DatabaseError> {
        let filter = FilterData { where_clause: vec![FilterWhereInfo::eq("id", id)], ..Default::default() };
        self.repository.select_one(filter).await
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Company>, DatabaseError> {
        self.repository.select_ids(ids).await
    }

    async fn create_company(&self, company: &Company, employees: &[Employee]) -> Result<(), DatabaseError> {
        let mut tx = self.repository.pool().begin().await?;
        insert_company(&mut tx, company).await?;
        insert_employees(&mut tx, employees).await?;

        tx.commit().await?;
        debug!("Created company {} with {} employees", company.id, employees.len());
        Ok(())
    }

    async fn create_companies(&self, companies: &[(Company, Vec<Employee>)]) -> Result<(), DatabaseError> {
        let mut tx = self.repository.pool().begin().await?;
        for (company, employees) in companies {
            insert_company(&mut tx, company).await?;
            insert_employees(&mut tx, employees).await?;
        }

        tx.commit().await?;
        debug!("Created {} companies", companies.len());
        Ok(())
    }

    async fn update_company(&self, company: &Company, new_employees: &[Employee]) -> Result<(), DatabaseError> {
        let mut tx = self.repository.pool().begin().await?;

        let result = sqlx::query("UPDATE companies SET name = $2, address = $3, country = $4 WHERE id = $1")
            .bind(company.id)
            .bind(&company.name)
            .bind(&company.address)
            .bind(&company.country)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Company {} not found", company.id)));
        }
        insert_employees(&mut tx, new_employees).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(self.repository.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("Company {} not found", id)));
        }
        Ok(())
    }
}
