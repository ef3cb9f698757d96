use uuid::Uuid;

use crate::api::{EmployeeLinks, EmployeeParameters, LinkContext, LinkResponse, MetaData};
use crate::database::models::Employee;
use crate::database::RepositoryManager;
use crate::dto::{EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto};
use crate::services::ServiceError;

#[derive(Clone)]
pub struct EmployeeService {
    repository: RepositoryManager,
}

impl EmployeeService {
    pub fn new(repository: RepositoryManager) -> Self {
        Self { repository }
    }

    /// One page of employees, shaped and linked for the requested media type.
    pub async fn get_employees(
        &self,
        company_id: Uuid,
        parameters: &EmployeeParameters,
        ctx: &LinkContext,
    ) -> Result<(LinkResponse, MetaData), ServiceError> {
        if !parameters.valid_age_range() {
            return Err(ServiceError::MaxAgeRange);
        }
        self.check_if_company_exists(company_id).await?;

        let page = self.repository.employee().get_employees(company_id, parameters).await?;
        let employees: Vec<EmployeeDto> = page.items.iter().map(EmployeeDto::from).collect();
        let links = EmployeeLinks::try_generate_links(&employees, parameters.request.fields.as_deref(), company_id, ctx)?;

        Ok((links, page.meta_data))
    }

    pub async fn get_employee(&self, company_id: Uuid, id: Uuid) -> Result<EmployeeDto, ServiceError> {
        self.check_if_company_exists(company_id).await?;
        let employee = self.get_employee_for_company_and_check_if_it_exists(company_id, id).await?;
        Ok(EmployeeDto::from(&employee))
    }

    pub async fn create_employee_for_company(
        &self,
        company_id: Uuid,
        employee: EmployeeForCreationDto,
    ) -> Result<EmployeeDto, ServiceError> {
        self.check_if_company_exists(company_id).await?;
        let entity = employee.into_entity(company_id);
        self.repository.employee().create_employee_for_company(company_id, &entity).await?;
        Ok(EmployeeDto::from(&entity))
    }

    pub async fn delete_employee_for_company(&self, company_id: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.check_if_company_exists(company_id).await?;
        let employee = self.get_employee_for_company_and_check_if_it_exists(company_id, id).await?;
        self.repository.employee().delete_employee(&employee).await?;
        Ok(())
    }

    pub async fn update_employee_for_company(
        &self,
        company_id: Uuid,
        id: Uuid,
        update: EmployeeForUpdateDto,
    ) -> Result<(), ServiceError> {
        self.check_if_company_exists(company_id).await?;
        let mut employee = self.get_employee_for_company_and_check_if_it_exists(company_id, id).await?;
        update.apply_to(&mut employee);
        self.repository.employee().update_employee(&employee).await?;
        Ok(())
    }

    /// The patch target document together with the entity it came from.
    pub async fn get_employee_for_patch(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<(EmployeeForUpdateDto, Employee), ServiceError> {
        self.check_if_company_exists(company_id).await?;
        let employee = self.get_employee_for_company_and_check_if_it_exists(company_id, id).await?;
        Ok((EmployeeForUpdateDto::from(&employee), employee))
    }

    pub async fn save_changes_for_patch(
        &self,
        patched: EmployeeForUpdateDto,
        mut employee: Employee,
    ) -> Result<(), ServiceError> {
        patched.apply_to(&mut employee);
        self.repository.employee().update_employee(&employee).await?;
        Ok(())
    }

    async fn check_if_company_exists(&self, company_id: Uuid) -> Result<(), ServiceError> {
        match self.repository.company().get_company(company_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::CompanyNotFound(company_id)),
        }
    }

    async fn get_employee_for_company_and_check_if_it_exists(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Employee, ServiceError> {
        self.repository
            .employee()
            .get_employee(company_id, id)
            .await?
            .ok_or(ServiceError::EmployeeNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EmployeeQuery;
    use crate::config::AppConfig;
    use crate::testing::{seeded_repositories, IT_SOLUTIONS_ID, SAM_RAIDEN_ID};

    fn service() -> EmployeeService {
        EmployeeService::new(seeded_repositories())
    }

    fn params(query: EmployeeQuery) -> EmployeeParameters {
        EmployeeParameters::from_query(query, &AppConfig::development().paging)
    }

    fn ctx() -> LinkContext {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(axum::http::header::HOST, axum::http::HeaderValue::from_static("localhost:5000"));
        LinkContext::from_headers(&headers, mime::APPLICATION_JSON).unwrap()
    }

    #[tokio::test]
    async fn rejects_inverted_age_range_before_lookup() {
        let query = EmployeeQuery { min_age: Some(40), max_age: Some(20), ..Default::default() };
        let err = service().get_employees(Uuid::new_v4(), &params(query), &ctx()).await.unwrap_err();
        assert!(matches!(err, ServiceError::MaxAgeRange));
    }

    #[tokio::test]
    async fn lists_filtered_page_with_metadata() {
        let query = EmployeeQuery { min_age: Some(27), fields: Some("name".into()), ..Default::default() };
        let (body, meta) = service().get_employees(IT_SOLUTIONS_ID, &params(query), &ctx()).await.unwrap();
        assert_eq!(meta.total_count, 1);
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!([{ "name": "Jana McLeaf" }]));
    }

    #[tokio::test]
    async fn unknown_company_is_not_found() {
        let err = service()
            .get_employees(Uuid::new_v4(), &params(EmployeeQuery::default()), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::CompanyNotFound(_)));
    }

    #[tokio::test]
    async fn employee_must_belong_to_company() {
        let service = service();
        assert_eq!(service.get_employee(IT_SOLUTIONS_ID, SAM_RAIDEN_ID).await.unwrap().name, "Sam Raiden");
        let other_company = crate::testing::ADMIN_SOLUTIONS_ID;
        assert!(matches!(
            service.get_employee(other_company, SAM_RAIDEN_ID).await,
            Err(ServiceError::EmployeeNotFound(_))
        ));
    }

    #[tokio::test]
    async fn create_update_and_delete_round() {
        let service = service();
        let created = service
            .create_employee_for_company(
                IT_SOLUTIONS_ID,
                EmployeeForCreationDto { name: Some("Mark".into()), age: Some(40), position: Some("CTO".into()) },
            )
            .await
            .unwrap();

        let update = EmployeeForUpdateDto { name: Some("Mark".into()), age: Some(41), position: Some("CEO".into()) };
        service.update_employee_for_company(IT_SOLUTIONS_ID, created.id, update).await.unwrap();
        let fetched = service.get_employee(IT_SOLUTIONS_ID, created.id).await.unwrap();
        assert_eq!((fetched.age, fetched.position.as_str()), (41, "CEO"));

        service.delete_employee_for_company(IT_SOLUTIONS_ID, created.id).await.unwrap();
        assert!(service.get_employee(IT_SOLUTIONS_ID, created.id).await.is_err());
    }
}
