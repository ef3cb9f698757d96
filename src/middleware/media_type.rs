use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::api::media::accepted_media_types;
use crate::api::LinkContext;
use crate::error::ApiError;

/// Requires a parseable `Accept` header and carries the preferred media
/// type, together with the request origin, to the link generator.
#[derive(Debug, Clone)]
pub struct ValidatedMediaType(pub LinkContext);

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ValidatedMediaType {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::ACCEPT) {
            return Err(ApiError::bad_request("Accept header is missing."));
        }

        let media_type = accepted_media_types(&parts.headers).into_iter().next().ok_or_else(|| {
            ApiError::bad_request("Media type not present. Please add Accept header with the required media type.")
        })?;

        let ctx = LinkContext::from_headers(&parts.headers, media_type)
            .map_err(|_| ApiError::bad_request("Invalid Host header."))?;
        Ok(ValidatedMediaType(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(accept: Option<&'static str>) -> Result<ValidatedMediaType, ApiError> {
        let mut builder = Request::builder().uri("/api/companies/x/employees").header(header::HOST, "localhost");
        if let Some(accept) = accept {
            builder = builder.header(header::ACCEPT, accept);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        ValidatedMediaType::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_accept_is_bad_request() {
        let err = extract(None).await.unwrap_err();
        assert_eq!(err.message(), "Accept header is missing.");
    }

    #[tokio::test]
    async fn garbage_accept_is_bad_request() {
        let err = extract(Some("not a media type")).await.unwrap_err();
        assert_eq!(
            err.message(),
            "Media type not present. Please add Accept header with the required media type."
        );
    }

    #[tokio::test]
    async fn keeps_preferred_media_type() {
        let ValidatedMediaType(ctx) = extract(Some("application/vnd.codemaze.hateoas+json")).await.unwrap();
        assert!(crate::api::media::is_hateoas(&ctx.media_type));
    }
}
