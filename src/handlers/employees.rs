// handlers/employees.rs - /api/companies/{companyId}/employees

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::api::{AcceptJson, EmployeeParameters, EmployeeQuery, JsonPatch};
use crate::dto::{EmployeeDto, EmployeeForCreationDto, EmployeeForUpdateDto};
use crate::error::ApiError;
use crate::handlers::companies::with_location;
use crate::middleware::{ValidatedJson, ValidatedMediaType};
use crate::services::ServiceError;
use crate::state::AppState;

pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("x-pagination");

/// GET|HEAD /api/companies/{companyId}/employees
///
/// Paging metadata travels in `X-Pagination`; the body is either shaped
/// entities or, for the hateoas media type, a linked wrapper.
pub async fn get_employees_for_company(
    State(state): State<AppState>,
    ValidatedMediaType(ctx): ValidatedMediaType,
    _json: AcceptJson,
    Path(company_id): Path<Uuid>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let parameters = EmployeeParameters::from_query(query, &state.config.paging);

    let (body, meta_data) = state.services.employee.get_employees(company_id, &parameters, &ctx).await?;

    let pagination = serde_json::to_string(&meta_data).map_err(ServiceError::from)?;
    let pagination = HeaderValue::from_str(&pagination)
        .map_err(|e| ApiError::internal_server_error(format!("Invalid pagination header: {}", e)))?;

    Ok(([(PAGINATION_HEADER, pagination)], Json(body)).into_response())
}

/// GET /api/companies/{companyId}/employees/{id}
pub async fn get_employee_for_company(
    State(state): State<AppState>,
    _json: AcceptJson,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> Result<Json<EmployeeDto>, ApiError> {
    let employee = state.services.employee.get_employee(company_id, id).await?;
    Ok(Json(employee))
}

/// POST /api/companies/{companyId}/employees
pub async fn create_employee_for_company(
    State(state): State<AppState>,
    _json: AcceptJson,
    Path(company_id): Path<Uuid>,
    ValidatedJson(employee): ValidatedJson<EmployeeForCreationDto>,
) -> Result<Response, ApiError> {
    let created = state.services.employee.create_employee_for_company(company_id, employee).await?;
    let location = format!("/api/companies/{}/employees/{}", company_id, created.id);

    with_location((StatusCode::CREATED, Json(created)).into_response(), &location)
}

/// DELETE /api/companies/{companyId}/employees/{id}
pub async fn delete_employee_for_company(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.services.employee.delete_employee_for_company(company_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/companies/{companyId}/employees/{id}
pub async fn update_employee_for_company(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    ValidatedJson(employee): ValidatedJson<EmployeeForUpdateDto>,
) -> Result<StatusCode, ApiError> {
    state.services.employee.update_employee_for_company(company_id, id, employee).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/companies/{companyId}/employees/{id}
///
/// The patch is applied to the update DTO, which must still validate.
pub async fn partially_update_employee_for_company(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(Uuid, Uuid)>,
    body: Option<Json<JsonPatch>>,
) -> Result<StatusCode, ApiError> {
    let Some(Json(patch_doc)) = body else {
        return Err(ApiError::bad_request("patchDoc object sent from client is null."));
    };

    let employees = &state.services.employee;
    let (to_patch, entity) = employees.get_employee_for_patch(company_id, id).await?;

    let patched: EmployeeForUpdateDto = patch_doc.apply_to(&to_patch).map_err(ServiceError::from)?;
    patched.validate().map_err(ServiceError::from)?;

    employees.save_changes_for_patch(patched, entity).await?;
    Ok(StatusCode::NO_CONTENT)
}
