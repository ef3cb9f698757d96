use thiserror::Error;
use uuid::Uuid;

use crate::api::PatchError;
use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::error::FieldErrors;

/// Domain failures raised by the service layer
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("The company with id: {0} doesn't exist in the database.")]
    CompanyNotFound(Uuid),

    #[error("Employee with id: {0} doesn't exist in the database.")]
    EmployeeNotFound(Uuid),

    #[error("Max age can't be less than min age.")]
    MaxAgeRange,

    #[error("Parameter ids is null")]
    IdParametersBadRequest,

    #[error("Collection count mismatch comparing to ids.")]
    CollectionByIds,

    #[error("Company collection sent from a client is null.")]
    CompanyCollectionBadRequest,

    #[error("Invalid client request. The tokenDto has some invalid properties.")]
    RefreshTokenBadRequest,

    #[error("Authentication failed. Wrong user name or password.")]
    InvalidCredentials,

    #[error("User registration failed")]
    Registration(FieldErrors),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    Patch(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<PatchError> for ServiceError {
    fn from(err: PatchError) -> Self {
        ServiceError::Patch(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(crate::dto::field_errors(&errors))
    }
}
