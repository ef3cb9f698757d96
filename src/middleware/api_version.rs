use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

pub const API_VERSION_HEADER: HeaderName = HeaderName::from_static("api-version");
pub const SUPPORTED_VERSIONS_HEADER: HeaderName = HeaderName::from_static("api-supported-versions");
const SUPPORTED_VERSIONS: &str = "1.0, 2.0";

/// API version requested through the `api-version` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    #[default]
    V1,
    V2,
}

impl ApiVersion {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "1" | "1.0" => Some(ApiVersion::V1),
            "2" | "2.0" => Some(ApiVersion::V2),
            _ => None,
        }
    }
}

/// Resolve the requested version and advertise the supported ones.
pub async fn api_version_middleware(mut request: Request, next: Next) -> Response {
    let requested = match request.headers().get(&API_VERSION_HEADER) {
        None => Ok(ApiVersion::default()),
        Some(value) => {
            let raw = value.to_str().unwrap_or_default();
            ApiVersion::parse(raw).ok_or_else(|| {
                ApiError::bad_request(format!(
                    "The HTTP resource that matches the request URI '{}' does not support the API version '{}'.",
                    request.uri().path(),
                    raw
                ))
            })
        }
    };

    let mut response = match requested {
        Ok(version) => {
            request.extensions_mut().insert(version);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    };
    response
        .headers_mut()
        .insert(SUPPORTED_VERSIONS_HEADER, HeaderValue::from_static(SUPPORTED_VERSIONS));
    response
}

#[axum::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ApiVersion {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<ApiVersion>().copied().unwrap_or_default())
    }
}
