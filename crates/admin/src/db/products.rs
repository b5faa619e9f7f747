//! Product management queries.

use sqlx::{PgPool, Postgres, QueryBuilder};

use telar_core::catalog::{PAGE_SIZE, Page, Product, ProductImage};
use telar_core::types::{CategoryId, Price, ProductId, ProductImageId};

use super::{RepositoryError, map_unique_violation};

/// Writable product fields, shared by create and update.
#[derive(Debug, Clone)]
pub struct ProductInput<'a> {
    pub name: &'a str,
    pub slug: &'a str,
    pub description: &'a str,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub category_id: CategoryId,
}

/// One product row in the admin listing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Price,
    pub active: bool,
    pub category_name: String,
    pub image_count: i64,
}

/// Repository for product management.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of the admin product listing, with an optional name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: u32,
    ) -> Result<Page<ProductRow>, RepositoryError> {
        let page = page.max(1);

        let mut count_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM catalog.product p");
        push_search(&mut count_query, search);
        let total: i64 = count_query.build_query_scalar().fetch_one(self.pool).await?;

        let mut select_query: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r"
            SELECT p.id, p.name, p.slug, p.price, p.active,
                   c.name AS category_name,
                   (SELECT COUNT(*) FROM catalog.product_image pi
                    WHERE pi.product_id = p.id) AS image_count
            FROM catalog.product p
            JOIN catalog.category c ON c.id = p.category_id
            ",
        );
        push_search(&mut select_query, search);
        select_query.push(" ORDER BY p.created_at DESC LIMIT ");
        select_query.push_bind(i64::from(PAGE_SIZE));
        select_query.push(" OFFSET ");
        select_query.push_bind(i64::from((page - 1) * PAGE_SIZE));

        let items = select_query
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(Page {
            items,
            total_count: u32::try_from(total).unwrap_or(0),
            page,
            page_size: PAGE_SIZE,
        })
    }

    /// Look up a product by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, slug, description, price, compare_at_price,
                   active, category_id, created_at
            FROM catalog.product
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the slug is taken, or
    /// `RepositoryError::Database` for any other failure.
    pub async fn create(&self, input: &ProductInput<'_>) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            INSERT INTO catalog.product
                (name, slug, description, price, compare_at_price, category_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, slug, description, price, compare_at_price,
                      active, category_id, created_at
            ",
        )
        .bind(input.name)
        .bind(input.slug)
        .bind(input.description)
        .bind(input.price)
        .bind(input.compare_at_price)
        .bind(input.category_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug"))?;

        Ok(product)
    }

    /// Update a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the slug is taken, or
    /// `RepositoryError::Database` for any other failure.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput<'_>,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            UPDATE catalog.product
            SET name = $2, slug = $3, description = $4, price = $5,
                compare_at_price = $6, category_id = $7
            WHERE id = $1
            RETURNING id, name, slug, description, price, compare_at_price,
                      active, category_id, created_at
            ",
        )
        .bind(id)
        .bind(input.name)
        .bind(input.slug)
        .bind(input.description)
        .bind(input.price)
        .bind(input.compare_at_price)
        .bind(input.category_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "slug"))?;

        Ok(product)
    }

    /// Flip a product's active flag, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle_active(&self, id: ProductId) -> Result<Option<bool>, RepositoryError> {
        let active = sqlx::query_scalar::<_, bool>(
            r"
            UPDATE catalog.product
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

    /// Delete a product. Its gallery rows go with it (FK cascade).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All images for a product, in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images(&self, product_id: ProductId) -> Result<Vec<ProductImage>, RepositoryError> {
        let images = sqlx::query_as::<_, ProductImage>(
            r"
            SELECT id, product_id, file_path, position
            FROM catalog.product_image
            WHERE product_id = $1
            ORDER BY position ASC
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(images)
    }

    /// Append an image to a product's gallery.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn add_image(
        &self,
        product_id: ProductId,
        file_path: &str,
    ) -> Result<ProductImage, RepositoryError> {
        let image = sqlx::query_as::<_, ProductImage>(
            r"
            INSERT INTO catalog.product_image (product_id, file_path, position)
            VALUES ($1, $2,
                    COALESCE((SELECT MAX(position) + 1 FROM catalog.product_image
                              WHERE product_id = $1), 0))
            RETURNING id, product_id, file_path, position
            ",
        )
        .bind(product_id)
        .bind(file_path)
        .fetch_one(self.pool)
        .await?;

        Ok(image)
    }

    /// Remove an image from a product's gallery.
    ///
    /// The image id is scoped to the product so a stale form cannot delete
    /// another product's image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_image(
        &self,
        product_id: ProductId,
        image_id: ProductImageId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM catalog.product_image WHERE id = $1 AND product_id = $2",
        )
        .bind(image_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Push the optional name search clause.
fn push_search(query: &mut QueryBuilder<'_, Postgres>, search: Option<&str>) {
    if let Some(text) = search {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            query.push(" WHERE p.name ILIKE ");
            query.push_bind(format!("%{trimmed}%"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_search_adds_no_clause() {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM catalog.product p");
        push_search(&mut query, Some("   "));
        assert!(!query.sql().contains("WHERE"));
    }

    #[test]
    fn search_is_trimmed_into_an_ilike_clause() {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM catalog.product p");
        push_search(&mut query, Some(" cojín "));
        assert!(query.sql().contains("p.name ILIKE"));
    }
}
