use tracing::info;
use uuid::Uuid;

use crate::database::models::{Company, Employee};
use crate::database::RepositoryManager;
use crate::dto::{CompanyDto, CompanyForCreationDto, CompanyForUpdateDto};
use crate::services::ServiceError;

#[derive(Clone)]
pub struct CompanyService {
    repository: RepositoryManager,
}

impl CompanyService {
    pub fn new(repository: RepositoryManager) -> Self {
        Self { repository }
    }

    pub async fn get_all_companies(&self) -> Result<Vec<CompanyDto>, ServiceError> {
        let companies = self.repository.company().get_all_companies().await?;
        Ok(companies.iter().map(CompanyDto::from).collect())
    }

    pub async fn get_company(&self, id: Uuid) -> Result<CompanyDto, ServiceError> {
        let company = self.get_company_and_check_if_it_exists(id).await?;
        Ok(CompanyDto::from(&company))
    }

    pub async fn create_company(&self, company: CompanyForCreationDto) -> Result<CompanyDto, ServiceError> {
        let (entity, employees) = company.into_entities();
        self.repository.company().create_company(&entity, &employees).await?;
        info!("Created company {} ({})", entity.id, entity.name);
        Ok(CompanyDto::from(&entity))
    }

    pub async fn get_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CompanyDto>, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::IdParametersBadRequest);
        }

        let companies = self.repository.company().get_by_ids(ids).await?;
        if companies.len() != ids.len() {
            return Err(ServiceError::CollectionByIds);
        }
        Ok(companies.iter().map(CompanyDto::from).collect())
    }

    /// Create every company or none; returns them with their ids joined by commas.
    pub async fn create_company_collection(
        &self,
        companies: Vec<CompanyForCreationDto>,
    ) -> Result<(Vec<CompanyDto>, String), ServiceError> {
        if companies.is_empty() {
            return Err(ServiceError::CompanyCollectionBadRequest);
        }

        let entities: Vec<(Company, Vec<Employee>)> = companies.into_iter().map(|c| c.into_entities()).collect();
        self.repository.company().create_companies(&entities).await?;
        info!("Created {} companies", entities.len());

        let created: Vec<CompanyDto> = entities.iter().map(|(company, _)| CompanyDto::from(company)).collect();
        let ids = created.iter().map(|c| c.id.to_string()).collect::<Vec<_>>().join(",");
        Ok((created, ids))
    }

    pub async fn delete_company(&self, id: Uuid) -> Result<(), ServiceError> {
        let company = self.get_company_and_check_if_it_exists(id).await?;
        self.repository.company().delete_company(company.id).await?;
        info!("Deleted company {}", id);
        Ok(())
    }

    pub async fn update_company(&self, id: Uuid, update: CompanyForUpdateDto) -> Result<(), ServiceError> {
        let mut company = self.get_company_and_check_if_it_exists(id).await?;
        let new_employees = update.apply_to(&mut company);
        self.repository.company().update_company(&company, &new_employees).await?;
        Ok(())
    }

    async fn get_company_and_check_if_it_exists(&self, id: Uuid) -> Result<Company, ServiceError> {
        self.repository
            .company()
            .get_company(id)
            .await?
            .ok_or(ServiceError::CompanyNotFound(id))
    }
}
