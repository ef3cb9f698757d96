use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::database::RepositoryManager;
use crate::middleware::cache_headers::HttpCacheStore;
use crate::services::ServiceManager;

/// Shared state handed to every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: ServiceManager,
    /// Absent when running against in-memory repositories
    pub pool: Option<PgPool>,
    pub cache: HttpCacheStore,
}

impl AppState {
    pub fn new(config: AppConfig, repository: RepositoryManager, pool: Option<PgPool>) -> Self {
        let services = ServiceManager::new(repository, config.security.jwt.clone());
        let cache = HttpCacheStore::new(config.cache.max_entries);
        Self { config: Arc::new(config), services, pool, cache }
    }

    /// State backed by Postgres repositories over `pool`.
    pub fn postgres(config: AppConfig, pool: PgPool) -> Self {
        Self::new(config, RepositoryManager::postgres(pool.clone()), Some(pool))
    }
}
