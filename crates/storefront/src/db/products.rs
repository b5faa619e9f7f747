//! Product queries: the catalog query builder and product detail reads.
//!
//! The listing query is built deterministically from a [`CatalogFilter`]:
//! clauses are pushed in a fixed order, so equal filters always produce the
//! same SQL shape (shareable URLs, cacheable plans). The count query reuses
//! the exact same predicate.

use sqlx::{PgPool, Postgres, QueryBuilder};

use telar_core::catalog::{CatalogFilter, Page, Product, ProductImage, SortKey, PAGE_SIZE};
use telar_core::types::{CategoryId, Price, ProductId};

use super::RepositoryError;

/// How the filter's category slug resolved.
///
/// An unknown or inactive slug yields zero results rather than silently
/// falling back to an unfiltered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryScope {
    /// No category filter requested.
    All,
    /// Filter to this category.
    Only(CategoryId),
    /// A category was requested but its slug did not resolve.
    NoMatch,
}

/// One product as shown on listing pages: the product plus its primary image.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub primary_image: Option<String>,
}

/// Repository for product reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run the catalog query for a filter, returning one page plus the total
    /// match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn search(
        &self,
        filter: &CatalogFilter,
        scope: CategoryScope,
    ) -> Result<Page<ProductCard>, RepositoryError> {
        if scope == CategoryScope::NoMatch {
            return Ok(Page::empty(filter.page));
        }

        let mut count_query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM catalog.product p");
        push_predicate(&mut count_query, filter, scope);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.pool)
            .await?;

        let mut select_query: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            r"
            SELECT p.id, p.name, p.slug, p.price, p.compare_at_price,
                   (SELECT pi.file_path
                    FROM catalog.product_image pi
                    WHERE pi.product_id = p.id
                    ORDER BY pi.position ASC
                    LIMIT 1) AS primary_image
            FROM catalog.product p
            ",
        );
        push_predicate(&mut select_query, filter, scope);
        push_order(&mut select_query, filter.sort);
        select_query.push(" LIMIT ");
        select_query.push_bind(i64::from(PAGE_SIZE));
        select_query.push(" OFFSET ");
        select_query.push_bind(i64::from(filter.offset()));

        let items = select_query
            .build_query_as::<ProductCard>()
            .fetch_all(self.pool)
            .await?;

        Ok(Page {
            items,
            total_count: u32::try_from(total).unwrap_or(0),
            page: filter.page,
            page_size: PAGE_SIZE,
        })
    }

    /// Look up an active product by slug, for the detail page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, slug, description, price, compare_at_price,
                   active, category_id, created_at
            FROM catalog.product
            WHERE slug = $1 AND active = TRUE
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Look up an active product by id, for cart snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, slug, description, price, compare_at_price,
                   active, category_id, created_at
            FROM catalog.product
            WHERE id = $1 AND active = TRUE
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// The primary image path for a product, if it has any images.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn primary_image(
        &self,
        product_id: ProductId,
    ) -> Result<Option<String>, RepositoryError> {
        let path = sqlx::query_scalar::<_, String>(
            r"
            SELECT file_path
            FROM catalog.product_image
            WHERE product_id = $1
            ORDER BY position ASC
            LIMIT 1
            ",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(path)
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

    /// The newest active products, for the home page strips.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn newest(&self, limit: u32) -> Result<Vec<ProductCard>, RepositoryError> {
        let items = sqlx::query_as::<_, ProductCard>(
            r"
            SELECT p.id, p.name, p.slug, p.price, p.compare_at_price,
                   (SELECT pi.file_path
                    FROM catalog.product_image pi
                    WHERE pi.product_id = p.id
                    ORDER BY pi.position ASC
                    LIMIT 1) AS primary_image
            FROM catalog.product p
            WHERE p.active = TRUE
            ORDER BY p.created_at DESC
            LIMIT $1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Push the shared WHERE clause. Clause order is fixed: active flag, then
/// free-text match, then category equality.
fn push_predicate(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &CatalogFilter,
    scope: CategoryScope,
) {
    query.push(" WHERE p.active = TRUE");

    if let Some(text) = &filter.query {
        let pattern = format!("%{text}%");
        query.push(" AND (p.name ILIKE ");
        query.push_bind(pattern.clone());
        query.push(" OR p.description ILIKE ");
        query.push_bind(pattern);
        query.push(")");
    }

    if let CategoryScope::Only(category_id) = scope {
        query.push(" AND p.category_id = ");
        query.push_bind(category_id);
    }
}

/// Push the ORDER BY clause for a sort key.
fn push_order(query: &mut QueryBuilder<'_, Postgres>, sort: SortKey) {
    match sort {
        SortKey::Newest => query.push(" ORDER BY p.created_at DESC"),
        SortKey::PriceAsc => query.push(" ORDER BY p.price ASC"),
        SortKey::PriceDesc => query.push(" ORDER BY p.price DESC"),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_sql(filter: &CatalogFilter, scope: CategoryScope) -> String {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM catalog.product p");
        push_predicate(&mut query, filter, scope);
        push_order(&mut query, filter.sort);
        query.sql().to_owned()
    }

    #[test]
    fn equal_filters_render_identical_sql() {
        let a = CatalogFilter::from_params(Some("lino"), None, Some("price_asc"), Some(2));
        let b = CatalogFilter::from_params(Some(" lino "), None, Some("price_asc"), Some(2));
        assert_eq!(
            rendered_sql(&a, CategoryScope::All),
            rendered_sql(&b, CategoryScope::All)
        );
    }

    #[test]
    fn free_text_adds_name_and_description_match() {
        let filter = CatalogFilter::from_params(Some("lino"), None, None, None);
        let sql = rendered_sql(&filter, CategoryScope::All);
        assert!(sql.contains("p.name ILIKE"));
        assert!(sql.contains("p.description ILIKE"));
    }

    #[test]
    fn category_scope_adds_equality_clause() {
        let filter = CatalogFilter::default();
        let scoped = rendered_sql(&filter, CategoryScope::Only(CategoryId::random()));
        let unscoped = rendered_sql(&filter, CategoryScope::All);
        assert!(scoped.contains("p.category_id ="));
        assert!(!unscoped.contains("p.category_id"));
    }

    #[tokio::test]
    async fn unresolved_category_yields_an_empty_page_without_querying() {
        // A lazy pool never connects; the query would fail if it ran.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();

        let filter = CatalogFilter::from_params(Some("lino"), Some("no-existe"), None, Some(3));
        let page = ProductRepository::new(&pool)
            .search(&filter, CategoryScope::NoMatch)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages(), 0);
        assert_eq!(page.page, 3);
    }

    #[test]
    fn sort_keys_map_to_order_clauses() {
        let base = CatalogFilter::default();

        let newest = rendered_sql(&base, CategoryScope::All);
        assert!(newest.contains("ORDER BY p.created_at DESC"));

        let mut filter = base.clone();
        filter.sort = SortKey::PriceAsc;
        assert!(rendered_sql(&filter, CategoryScope::All).contains("ORDER BY p.price ASC"));

        filter.sort = SortKey::PriceDesc;
        assert!(rendered_sql(&filter, CategoryScope::All).contains("ORDER BY p.price DESC"));
    }
}
