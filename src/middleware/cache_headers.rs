use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lru::LruCache;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::config::CacheConfig;
use crate::error::ApiError;
use crate::middleware::api_version::API_VERSION_HEADER;
use crate::state::AppState;

#[derive(Debug, Clone)]
struct CacheEntry {
    path: String,
    etag: String,
    last_modified: SystemTime,
}

/// Last validator issued per representation (path, query, Accept and API version).
#[derive(Clone)]
pub struct HttpCacheStore {
    entries: Arc<Mutex<LruCache<String, CacheEntry>>>,
}

impl HttpCacheStore {
    /// Store holding at most `capacity` validators.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self { entries: Arc::new(Mutex::new(LruCache::new(capacity))) }
    }

    /// Record the ETag for a representation; `Last-Modified` only moves
    /// when the ETag changes.
    async fn store(&self, key: String, path: &str, etag: String) -> CacheEntry {
        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&key) {
            if existing.etag == etag {
                return existing.clone();
            }
        }
        let entry = CacheEntry { path: path.to_string(), etag, last_modified: SystemTime::now() };
        entries.put(key, entry.clone());
        entry
    }

    async fn etags_for_path(&self, path: &str) -> Vec<String> {
        let entries = self.entries.lock().await;
        entries.iter().filter(|(_, e)| e.path == path).map(|(_, e)| e.etag.clone()).collect()
    }

    /// Forget validators for `path`, its sub-resources and its parent collections.
    pub async fn invalidate(&self, path: &str) {
        let mut entries = self.entries.lock().await;
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, e)| e.path.starts_with(path) || path.starts_with(&e.path))
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            entries.pop(&key);
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

fn cache_key(request: &Request) -> String {
    let header_str = |name: &str| request.headers().get(name).and_then(|v| v.to_str().ok()).unwrap_or("");
    format!(
        "{}?{}|{}|{}",
        request.uri().path(),
        request.uri().query().unwrap_or(""),
        header_str(header::ACCEPT.as_str()),
        header_str(API_VERSION_HEADER.as_str()),
    )
}

fn compute_etag(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("\"{:x}\"", hasher.finalize())
}

/// True when any entity tag in an `If-None-Match`/`If-Match` value matches.
fn etag_matches(header_value: &str, etag: &str) -> bool {
    header_value
        .split(',')
        .map(|t| t.trim().trim_start_matches("W/"))
        .any(|t| t == "*" || t == etag)
}

fn cache_control(config: &CacheConfig) -> String {
    let mut parts = vec![if config.private { "private".to_string() } else { "public".to_string() }];
    parts.push(format!("max-age={}", config.max_age_secs));
    if config.must_revalidate {
        parts.push("must-revalidate".to_string());
    }
    parts.join(", ")
}

fn apply_headers(headers: &mut HeaderMap, config: &CacheConfig, entry: Option<&CacheEntry>) {
    let now = SystemTime::now();
    let mut set = |name: header::HeaderName, value: String| {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    };

    set(header::CACHE_CONTROL, cache_control(config));
    set(header::EXPIRES, httpdate::fmt_http_date(now + Duration::from_secs(config.max_age_secs)));
    set(header::VARY, "Accept".to_string());
    if let Some(entry) = entry {
        set(header::ETAG, entry.etag.clone());
        set(header::LAST_MODIFIED, httpdate::fmt_http_date(entry.last_modified));
    }
}

/// Expiration and validation headers for reads; successful writes drop
/// the validators they made stale.
pub async fn http_cache_headers(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let config = &state.config.cache;
    if !config.enable_cache_headers {
        return next.run(request).await;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if method == Method::GET || method == Method::HEAD {
        let key = cache_key(&request);
        let if_none_match = request
            .headers()
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // HEAD is validated against the GET representation; the body is dropped below
        if method == Method::HEAD {
            *request.method_mut() = Method::GET;
        }

        let response = next.run(request).await;
        if !response.status().is_success() {
            return response;
        }

        let (mut parts, body) = response.into_parts();
        let bytes = match to_bytes(body, usize::MAX).await {
            Ok(bytes) => bytes,
            Err(e) => return ApiError::internal_server_error(format!("Failed to buffer response: {}", e)).into_response(),
        };
        let entry = state.cache.store(key, &path, compute_etag(&bytes)).await;

        if if_none_match.as_deref().is_some_and(|inm| etag_matches(inm, &entry.etag)) {
            let mut not_modified = StatusCode::NOT_MODIFIED.into_response();
            apply_headers(not_modified.headers_mut(), config, Some(&entry));
            return not_modified;
        }

        apply_headers(&mut parts.headers, config, Some(&entry));
        if method == Method::HEAD {
            parts.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(bytes.len()));
            return Response::from_parts(parts, Body::empty());
        }
        return Response::from_parts(parts, Body::from(bytes));
    }

    let response = next.run(request).await;
    if response.status().is_success() && method != Method::OPTIONS {
        state.cache.invalidate(&path).await;
    }
    response
}

/// Rejects `PUT`/`PATCH` whose `If-Match` names none of the validators
/// issued for the target. Mounted inside authentication.
pub async fn if_match_precondition(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let guarded = request.method() == Method::PUT || request.method() == Method::PATCH;
    let if_match = request.headers().get(header::IF_MATCH).and_then(|v| v.to_str().ok()).map(str::to_string);

    if let Some(if_match) = if_match.filter(|_| guarded && state.config.cache.enable_cache_headers) {
        let path = request.uri().path().to_string();
        let known = state.cache.etags_for_path(&path).await;
        if !known.is_empty() && !known.iter().any(|etag| etag_matches(&if_match, etag)) {
            tracing::debug!("If-Match precondition failed for {}", path);
            return ApiError::precondition_failed("The resource has been modified since it was last retrieved.")
                .into_response();
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etags_are_quoted_sha256() {
        let etag = compute_etag(b"[]");
        assert!(etag.starts_with('"') && etag.ends_with('"'));
        assert_eq!(etag.len(), 66);
        assert_eq!(etag, compute_etag(b"[]"));
        assert_ne!(etag, compute_etag(b"{}"));
    }

    #[test]
    fn matches_lists_weak_tags_and_wildcard() {
        assert!(etag_matches("\"a\", W/\"b\"", "\"b\""));
        assert!(etag_matches("*", "\"x\""));
        assert!(!etag_matches("\"a\"", "\"b\""));
    }

    #[test]
    fn builds_cache_control() {
        let config = crate::config::AppConfig::development().cache;
        assert_eq!(cache_control(&config), "private, max-age=65, must-revalidate");
    }

    #[tokio::test]
    async fn invalidation_covers_parents_and_children() {
        let store = HttpCacheStore::new(16);
        store.store("a".into(), "/api/companies", "\"1\"".into()).await;
        store.store("b".into(), "/api/companies/1/employees", "\"2\"".into()).await;
        store.store("c".into(), "/api/companies/2", "\"3\"".into()).await;

        store.invalidate("/api/companies/1/employees/9").await;
        assert_eq!(store.len().await, 1);
        assert_eq!(store.etags_for_path("/api/companies/2").await, vec!["\"3\""]);
    }

    #[tokio::test]
    async fn store_evicts_least_recently_used_beyond_capacity() {
        let store = HttpCacheStore::new(3);
        for i in 0..50 {
            store.store(format!("/api/companies/x/employees?junk={}", i), "/api/companies/x/employees", format!("\"{}\"", i)).await;
        }
        assert_eq!(store.len().await, 3);
        assert_eq!(store.etags_for_path("/api/companies/x/employees").await.len(), 3);
    }

    #[tokio::test]
    async fn unchanged_etag_keeps_last_modified() {
        let store = HttpCacheStore::new(4);
        let first = store.store("k".into(), "/p", "\"1\"".into()).await;
        let again = store.store("k".into(), "/p", "\"1\"".into()).await;
        assert_eq!(first.last_modified, again.last_modified);
    }
}
