//! Category management queries.
//!
//! Unlike the storefront, the admin panel sees inactive rows too.

use sqlx::PgPool;

use telar_core::catalog::Category;
use telar_core::types::CategoryId;

use super::{RepositoryError, map_unique_violation};

/// Repository for category management.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories, active or not, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, description, hero_image, position, active
            FROM catalog.category
            ORDER BY position ASC, name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Look up a category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, slug, description, hero_image, position, active
            FROM catalog.category
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the slug is taken, or
    /// `RepositoryError::Database` for any other failure.
    pub async fn create(
        &self,
        name: &str,
        slug: &str,
        description: Option<&str>,
        hero_image: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            INSERT INTO catalog.category (name, slug, description, hero_image, position)
            VALUES ($1, $2, $3, $4,
                    COALESCE((SELECT MAX(position) + 1 FROM catalog.category), 0))
            RETURNING id, name, slug, description, hero_image, position, active
            ",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(hero_image)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug"))?;

        Ok(category)
    }

    /// Update a category's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the slug is taken, or
    /// `RepositoryError::Database` for any other failure.
    pub async fn update(
        &self,
        id: CategoryId,
        name: &str,
        slug: &str,
        description: Option<&str>,
        hero_image: Option<&str>,
    ) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            r"
            UPDATE catalog.category
            SET name = $2, slug = $3, description = $4, hero_image = $5
            WHERE id = $1
            RETURNING id, name, slug, description, hero_image, position, active
            ",
        )
        .bind(id)
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(hero_image)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug"))?;

        Ok(category)
    }

    /// Flip a category's active flag, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_active(&self, id: CategoryId) -> Result<Option<bool>, RepositoryError> {
        let active = sqlx::query_scalar::<_, bool>(
            r"
            UPDATE catalog.category
            SET active = NOT active
            WHERE id = $1
            RETURNING active
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(active)
    }

    /// Number of products assigned to a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: CategoryId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM catalog.product WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Delete a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::StillReferenced` if products are still
    /// assigned to it, or `RepositoryError::Database` for any other failure.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        if self.product_count(id).await? > 0 {
            return Err(RepositoryError::StillReferenced("category"));
        }

        let result = sqlx::query("DELETE FROM catalog.category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
