use axum::{
    extract::Request,
    http::{header, HeaderName, StatusCode},
    middleware::Next,
    response::Response,
};

const RATE_LIMIT_AFTER: HeaderName = HeaderName::from_static("x-ratelimit-after");

/// Mirror the governor's wait time into `Retry-After` on 429 responses.
pub async fn retry_after_header(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if response.status() == StatusCode::TOO_MANY_REQUESTS && !response.headers().contains_key(header::RETRY_AFTER) {
        if let Some(after) = response.headers().get(&RATE_LIMIT_AFTER).cloned() {
            response.headers_mut().insert(header::RETRY_AFTER, after);
        }
    }
    response
}
