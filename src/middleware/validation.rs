use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ApiError;

/// JSON body; anything that cannot be read as `T` is a 400 naming the type.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

/// JSON body that must also pass `T`'s validation rules (422 otherwise).
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

fn dto_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => {
                tracing::debug!("Rejected {} body: {}", dto_name::<T>(), rejection.body_text());
                Err(ApiError::bad_request(format!("{} object is null", dto_name::<T>())))
            }
        }
    }
}

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{EmployeeForCreationDto, UserForAuthenticationDto};
    use axum::{body::Body, http::{header, StatusCode}};

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn names_the_dto() {
        assert_eq!(dto_name::<EmployeeForCreationDto>(), "EmployeeForCreationDto");
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let err = JsonBody::<EmployeeForCreationDto>::from_request(json_request("null"), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "EmployeeForCreationDto object is null");
    }

    #[tokio::test]
    async fn invalid_body_is_unprocessable() {
        let err = ValidatedJson::<EmployeeForCreationDto>::from_request(json_request(r#"{"name":"Sam","age":12}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = err.to_json();
        assert_eq!(body["errors"]["age"][0], "Age is required and it can't be lower than 18.");
        assert_eq!(body["errors"]["position"][0], "Position is a required field.");
    }

    #[tokio::test]
    async fn valid_body_passes() {
        let ValidatedJson(dto) =
            ValidatedJson::<UserForAuthenticationDto>::from_request(json_request(r#"{"userName":"jdoe","password":"Passw0rd"}"#), &())
                .await
                .unwrap();
        assert_eq!(dto.user_name.as_deref(), Some("jdoe"));
    }
}
