use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::handlers::{authentication, companies, employees, root};
use crate::middleware::{
    api_version_middleware, http_cache_headers, if_match_precondition, jwt_auth_middleware, retry_after_header,
};
use crate::state::AppState;

/// Build the application router with every route and middleware layer.
pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_routes = Router::new()
        .route("/api", get(root::get_root))
        .route("/health", get(root::health))
        .route("/api/authentication", post(authentication::register_user))
        .route("/api/authentication/login", post(authentication::authenticate))
        .route("/api/token/refresh", post(authentication::refresh))
        .route(
            "/api/companies/:companyId/employees",
            get(employees::get_employees_for_company).post(employees::create_employee_for_company),
        )
        .route(
            "/api/companies/:companyId/employees/:id",
            get(employees::get_employee_for_company)
                .put(employees::update_employee_for_company)
                .patch(employees::partially_update_employee_for_company)
                .delete(employees::delete_employee_for_company),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), if_match_precondition));

    // Company routes require a valid bearer token, checked before any precondition
    let protected_routes = Router::new()
        .route(
            "/api/companies",
            get(companies::get_companies)
                .post(companies::create_company)
                .options(companies::get_companies_options),
        )
        .route("/api/companies/collection", post(companies::create_company_collection))
        .route("/api/companies/collection/:ids", get(companies::get_company_collection))
        .route(
            "/api/companies/:companyId",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), if_match_precondition))
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let router = public_routes
        .merge(protected_routes)
        // Middleware layers (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(state.clone(), http_cache_headers))
        .layer(middleware::from_fn(api_version_middleware))
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.security.cors_origins))
        .with_state(state);

    if !config.api.enable_rate_limiting {
        return router;
    }

    // Per client IP: `rate_limit_requests` per `rate_limit_window_secs`
    let (requests, replenish_ms) = rate_limit_quota(&config.api);
    let governor = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(replenish_ms)
        .burst_size(requests)
        .use_headers()
        .finish();

    match governor {
        Some(governor) => router
            .layer(GovernorLayer { config: Arc::new(governor) })
            .layer(middleware::from_fn(retry_after_header)),
        None => {
            tracing::warn!("Invalid rate limit configuration, requests are not limited");
            router
        }
    }
}

/// Burst size and the interval after which one request is replenished.
fn rate_limit_quota(api: &ApiConfig) -> (u32, u64) {
    let requests = api.rate_limit_requests.max(1);
    let replenish_ms = (api.rate_limit_window_secs * 1000 / u64::from(requests)).max(1);
    (requests, replenish_ms)
}

/// `*` allows any origin; otherwise only the listed ones.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::IF_MATCH,
            header::IF_NONE_MATCH,
        ])
        .expose_headers([employees::PAGINATION_HEADER])
        .max_age(Duration::from_secs(3600));

    if origins.iter().any(|o| o == "*") {
        cors.allow_origin(tower_http::cors::Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|s| s.trim().parse().ok()).collect();
        cors.allow_origin(allowed)
    }
}
