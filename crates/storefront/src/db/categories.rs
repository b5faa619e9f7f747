//! Read-only category queries for the public catalog.

use sqlx::PgPool;

use telar_core::catalog::Category;
use telar_core::types::CategoryId;

use super::RepositoryError;

/// Repository for category reads.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All active categories in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, description, hero_image, position, active
            FROM catalog.category
            WHERE active = TRUE
            ORDER BY position ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Look up an active category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, description, hero_image, position, active
            FROM catalog.category
            WHERE slug = $1 AND active = TRUE
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Resolve an active category slug to its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn resolve_slug(&self, slug: &str) -> Result<Option<CategoryId>, RepositoryError> {
        let id = sqlx::query_scalar::<_, CategoryId>(
            r"
            SELECT id
            FROM catalog.category
            WHERE slug = $1 AND active = TRUE
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(id)
    }
}
