//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use telar_core::types::CategoryId;

use crate::config::StorefrontConfig;
use crate::db::{CategoryRepository, RepositoryError};
use crate::db::products::CategoryScope;

/// How long a category slug resolution stays cached.
const CATEGORY_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to configuration, the
/// database pool, and the category-slug resolution cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    /// slug -> resolved category id; `None` caches failed resolutions too,
    /// so hammering an unknown slug does not hammer the database.
    category_ids: Cache<String, Option<CategoryId>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let category_ids = Cache::builder()
            .max_capacity(256)
            .time_to_live(CATEGORY_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                category_ids,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Resolve a filter's category slug to a query scope, through the cache.
    ///
    /// Resolution failures are logged and treated as "no match": the listing
    /// degrades to zero results instead of erroring.
    pub async fn category_scope(&self, slug: Option<&str>) -> CategoryScope {
        let Some(slug) = slug else {
            return CategoryScope::All;
        };

        let resolved: Result<Option<CategoryId>, Arc<RepositoryError>> = self
            .inner
            .category_ids
            .try_get_with(slug.to_owned(), async {
                CategoryRepository::new(self.pool()).resolve_slug(slug).await
            })
            .await;

        match resolved {
            Ok(Some(id)) => CategoryScope::Only(id),
            Ok(None) => CategoryScope::NoMatch,
            Err(e) => {
                tracing::warn!("category slug resolution failed for {slug}: {e}");
                CategoryScope::NoMatch
            }
        }
    }
}
