// handlers/root.rs - GET /api and GET /health

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::api::links::root_links;
use crate::api::media::{accepted_media_types, is_api_root};
use crate::api::LinkContext;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::state::AppState;

/// Entry point document; links are only produced for the `apiroot` media type.
pub async fn get_root(headers: HeaderMap) -> Result<Response, ApiError> {
    let media_type = accepted_media_types(&headers).into_iter().next().filter(is_api_root);

    match media_type {
        Some(media_type) => {
            let ctx = LinkContext::from_headers(&headers, media_type)
                .map_err(|_| ApiError::bad_request("Invalid Host header."))?;
            Ok(Json(root_links(&ctx)).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let Some(pool) = state.pool.as_ref() else {
        return (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "in-memory" })),
        );
    };

    match DatabaseManager::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}
