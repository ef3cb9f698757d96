// handlers/companies.rs - /api/companies (JWT required)

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use uuid::Uuid;
use validator::Validate;

use crate::api::{Formatted, Negotiate};
use crate::dto::{field_errors, CompanyForCreationDto, CompanyForUpdateDto};
use crate::error::{ApiError, FieldErrors};
use crate::middleware::{ApiVersion, AuthUser, ValidatedJson};
use crate::services::ServiceError;
use crate::state::AppState;

const MANAGER_ROLE: &str = "Manager";

/// GET /api/companies
///
/// Version 1 lists company DTOs as JSON or CSV and needs the Manager role;
/// version 2 lists the names only, as JSON.
pub async fn get_companies(
    State(state): State<AppState>,
    version: ApiVersion,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let format = Negotiate::from_headers(&headers, version == ApiVersion::V1)?;
    let companies = state.services.company.get_all_companies().await?;

    match version {
        ApiVersion::V1 => {
            user.require_role(MANAGER_ROLE)?;
            Formatted::new(format, companies).render()
        }
        ApiVersion::V2 => {
            let names: Vec<String> = companies.into_iter().map(|c| format!("{} v2", c.name)).collect();
            Ok(Json(names).into_response())
        }
    }
}

/// GET /api/companies/{id}
pub async fn get_company(
    State(state): State<AppState>,
    Negotiate(format): Negotiate,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let company = state.services.company.get_company(id).await?;
    Formatted::new(format, company).render()
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    Negotiate(format): Negotiate,
    ValidatedJson(company): ValidatedJson<CompanyForCreationDto>,
) -> Result<Response, ApiError> {
    let created = state.services.company.create_company(company).await?;
    let location = format!("/api/companies/{}", created.id);

    let response = Formatted::new(format, created).with_status(StatusCode::CREATED).render()?;
    with_location(response, &location)
}

/// GET /api/companies/collection/({ids})
pub async fn get_company_collection(
    State(state): State<AppState>,
    Negotiate(format): Negotiate,
    Path(ids): Path<String>,
) -> Result<Response, ApiError> {
    let ids = parse_id_list(&ids)?;
    let companies = state.services.company.get_by_ids(&ids).await?;
    Formatted::new(format, companies).render()
}

/// POST /api/companies/collection
pub async fn create_company_collection(
    State(state): State<AppState>,
    Negotiate(format): Negotiate,
    body: Option<Json<Vec<CompanyForCreationDto>>>,
) -> Result<Response, ApiError> {
    let Some(Json(companies)) = body else {
        return Err(ServiceError::CompanyCollectionBadRequest.into());
    };

    let mut errors = FieldErrors::new();
    for (index, company) in companies.iter().enumerate() {
        if let Err(e) = company.validate() {
            for (field, messages) in field_errors(&e) {
                errors.entry(format!("[{}].{}", index, field)).or_default().extend(messages);
            }
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity("One or more validation errors occurred.", errors));
    }

    let (created, ids) = state.services.company.create_company_collection(companies).await?;
    let location = format!("/api/companies/collection/({})", ids);

    let response = Formatted::new(format, created).with_status(StatusCode::CREATED).render()?;
    with_location(response, &location)
}

/// DELETE /api/companies/{id}
pub async fn delete_company(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.services.company.delete_company(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/companies/{id}
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(company): ValidatedJson<CompanyForUpdateDto>,
) -> Result<StatusCode, ApiError> {
    state.services.company.update_company(id, company).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// OPTIONS /api/companies
pub async fn get_companies_options() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, "GET, OPTIONS, POST")])
}

/// Parse `(id1,id2,...)`; the parentheses are optional.
fn parse_id_list(raw: &str) -> Result<Vec<Uuid>, ApiError> {
    let inner = raw.trim().trim_start_matches('(').trim_end_matches(')');

    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| ApiError::bad_request(format!("The value '{}' is not a valid id.", s)))
        })
        .collect()
}

pub(crate) fn with_location(mut response: Response, location: &str) -> Result<Response, ApiError> {
    let value = HeaderValue::from_str(location)
        .map_err(|e| ApiError::internal_server_error(format!("Invalid Location header: {}", e)))?;
    response.headers_mut().insert(header::LOCATION, value);
    Ok(response)
}
