// HTTP API Error Types
use std::collections::BTreeMap;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::services::ServiceError;

/// Field name to validation messages
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError { message: String, field_errors: FieldErrors },

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 406 Not Acceptable
    NotAcceptable(String),

    // 409 Conflict
    Conflict(String),

    // 412 Precondition Failed
    PreconditionFailed(String),

    // 422 Unprocessable Entity
    UnprocessableEntity { message: String, field_errors: FieldErrors },

    // 429 Too Many Requests
    TooManyRequests(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            ApiError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe message; internal errors never leak their cause.
    pub fn message(&self) -> &str {
        match self {
            ApiError::InternalServerError(_) => "Internal Server Error",
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::NotAcceptable(msg)
            | ApiError::Conflict(msg)
            | ApiError::PreconditionFailed(msg)
            | ApiError::TooManyRequests(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::ValidationError { message, .. } | ApiError::UnprocessableEntity { message, .. } => message,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::NotAcceptable(_) => "NOT_ACCEPTABLE",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::PreconditionFailed(_) => "PRECONDITION_FAILED",
            ApiError::UnprocessableEntity { .. } => "UNPROCESSABLE_ENTITY",
            ApiError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "statusCode": self.status_code().as_u16(),
            "message": self.message(),
            "code": self.error_code(),
        });
        match self {
            ApiError::ValidationError { field_errors, .. } | ApiError::UnprocessableEntity { field_errors, .. } => {
                body["errors"] = json!(field_errors);
            }
            _ => {}
        }
        body
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ApiError::ValidationError { message: message.into(), field_errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn not_acceptable(message: impl Into<String>) -> Self {
        ApiError::NotAcceptable(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        ApiError::PreconditionFailed(message.into())
    }

    pub fn unprocessable_entity(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ApiError::UnprocessableEntity { message: message.into(), field_errors }
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        ApiError::TooManyRequests(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut) => {
                tracing::error!("Database pool timed out");
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            other => ApiError::internal_server_error(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(_) | AuthError::MissingToken => ApiError::unauthorized(err.to_string()),
            other => ApiError::internal_server_error(other.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::CompanyNotFound(_) | ServiceError::EmployeeNotFound(_) => ApiError::not_found(err.to_string()),
            ServiceError::MaxAgeRange
            | ServiceError::IdParametersBadRequest
            | ServiceError::CollectionByIds
            | ServiceError::CompanyCollectionBadRequest
            | ServiceError::RefreshTokenBadRequest => ApiError::bad_request(err.to_string()),
            ServiceError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            ServiceError::Registration(errors) => ApiError::validation_error("User registration failed", errors),
            ServiceError::Validation(errors) => {
                ApiError::unprocessable_entity("One or more validation errors occurred.", errors)
            }
            ServiceError::Patch(message) => {
                let mut errors = FieldErrors::new();
                errors.insert("patchDoc".to_string(), vec![message]);
                ApiError::unprocessable_entity("One or more validation errors occurred.", errors)
            }
            ServiceError::Auth(auth) => auth.into(),
            ServiceError::Database(db) => db.into(),
            ServiceError::Serialization(e) => ApiError::internal_server_error(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::unprocessable_entity("One or more validation errors occurred.", crate::dto::field_errors(&errors))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InternalServerError(detail) => write!(f, "{}", detail),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Something went wrong: {}", self);
        }
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn not_found_body_carries_message() {
        let id = Uuid::nil();
        let err: ApiError = ServiceError::CompanyNotFound(id).into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let body = err.to_json();
        assert_eq!(body["statusCode"], 404);
        assert_eq!(
            body["message"],
            format!("The company with id: {} doesn't exist in the database.", id)
        );
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::internal_server_error("connection refused by 10.0.0.3");
        assert_eq!(err.to_json()["message"], "Internal Server Error");
        assert!(err.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn unprocessable_entity_lists_field_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("age".into(), vec!["Age is required and it can't be lower than 18.".into()]);
        let body = ApiError::unprocessable_entity("One or more validation errors occurred.", errors).to_json();
        assert_eq!(body["statusCode"], 422);
        assert_eq!(body["errors"]["age"][0], "Age is required and it can't be lower than 18.");
    }
}
