// handlers/authentication.rs - registration, login and token refresh (public)

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::dto::{TokenDto, UserForAuthenticationDto, UserForRegistrationDto};
use crate::error::ApiError;
use crate::middleware::{JsonBody, ValidatedJson};
use crate::state::AppState;

/// POST /api/authentication
pub async fn register_user(
    State(state): State<AppState>,
    ValidatedJson(registration): ValidatedJson<UserForRegistrationDto>,
) -> Result<Response, ApiError> {
    state.services.authentication.register_user(registration).await?;
    Ok(StatusCode::CREATED.into_response())
}

/// POST /api/authentication/login
pub async fn authenticate(
    State(state): State<AppState>,
    ValidatedJson(credentials): ValidatedJson<UserForAuthenticationDto>,
) -> Result<Json<TokenDto>, ApiError> {
    let auth = &state.services.authentication;
    let user = auth.validate_user(&credentials).await?;
    let token = auth.create_token(&user, true).await?;
    Ok(Json(token))
}

/// POST /api/token/refresh
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(token): JsonBody<TokenDto>,
) -> Result<Json<TokenDto>, ApiError> {
    let token = state.services.authentication.refresh_token(token).await?;
    Ok(Json(token))
}
