//! Catalog entities and the filter/pagination model.
//!
//! A [`CatalogFilter`] is derived from request query parameters on every
//! catalog view and never stored; two equal filters must always describe the
//! same query shape so listing URLs are shareable and cacheable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, Price, ProductId, ProductImageId};

/// Products shown per catalog page.
pub const PAGE_SIZE: u32 = 12;

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Most recently created first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceAsc,
    /// Most expensive first.
    PriceDesc,
}

impl SortKey {
    /// Parse a query-parameter value; unknown values fall back to newest.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    /// The query-parameter value for this sort.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
        }
    }
}

/// The set of search/sort/pagination parameters describing one listing view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogFilter {
    /// Free-text query matched against name and description.
    pub query: Option<String>,
    /// Restrict results to one category, addressed by slug.
    pub category_slug: Option<String>,
    /// Sort order.
    pub sort: SortKey,
    /// 1-based page number.
    pub page: u32,
}

impl CatalogFilter {
    /// Build a normalized filter from raw query-parameter values.
    ///
    /// Whitespace-only queries are treated as absent, unknown sort values
    /// fall back to newest, and page numbers below 1 clamp to 1.
    #[must_use]
    pub fn from_params(
        query: Option<&str>,
        category_slug: Option<&str>,
        sort: Option<&str>,
        page: Option<u32>,
    ) -> Self {
        Self {
            query: query
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_owned),
            category_slug: category_slug
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            sort: sort.map(SortKey::parse).unwrap_or_default(),
            page: page.unwrap_or(1).max(1),
        }
    }

    /// Row offset for the filter's page.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        (self.page.saturating_sub(1)).saturating_mul(PAGE_SIZE)
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u32,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    /// An empty page (zero results, zero pages).
    #[must_use]
    pub const fn empty(page: u32) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
            page_size: PAGE_SIZE,
        }
    }

    /// Total page count: `ceil(total_count / page_size)`.
    ///
    /// Zero results mean zero pages; the pagination UI must render that as
    /// "no results", never "page 1 of 0".
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_count.div_ceil(self.page_size)
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page < self.total_pages()
    }
}

/// A product category (read-only to the cart/catalog core).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub hero_image: Option<String>,
    pub position: i32,
    pub active: bool,
}

/// A catalog product (read-only to the cart/catalog core).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub price: Price,
    pub compare_at_price: Option<Price>,
    pub active: bool,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

/// A product image URL with its display position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub file_path: String,
    pub position: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_only_query_is_absent() {
        let filter = CatalogFilter::from_params(Some("   "), None, None, None);
        assert_eq!(filter.query, None);

        let filter = CatalogFilter::from_params(Some("  lino "), None, None, None);
        assert_eq!(filter.query.as_deref(), Some("lino"));
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(SortKey::parse("price_asc"), SortKey::PriceAsc);
        assert_eq!(SortKey::parse("price_desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::parse("latest"), SortKey::Newest);
        assert_eq!(SortKey::parse(""), SortKey::Newest);
    }

    #[test]
    fn page_below_one_clamps_to_one() {
        let clamped = CatalogFilter::from_params(None, None, None, Some(0));
        let first = CatalogFilter::from_params(None, None, None, Some(1));
        assert_eq!(clamped, first);
        assert_eq!(clamped.offset(), 0);
    }

    #[test]
    fn offset_follows_page_size() {
        let filter = CatalogFilter::from_params(None, None, None, Some(3));
        assert_eq!(filter.offset(), 2 * PAGE_SIZE);
    }

    #[test]
    fn equal_params_build_equal_filters() {
        let a = CatalogFilter::from_params(Some("lino"), Some("cojines"), Some("price_asc"), Some(2));
        let b = CatalogFilter::from_params(Some(" lino "), Some("cojines"), Some("price_asc"), Some(2));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_results_means_zero_pages() {
        let page: Page<u8> = Page::empty(1);
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_more());
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u8> = Page {
            items: Vec::new(),
            total_count: 13,
            page: 1,
            page_size: PAGE_SIZE,
        };
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_more());

        let exact: Page<u8> = Page {
            items: Vec::new(),
            total_count: 24,
            page: 2,
            page_size: PAGE_SIZE,
        };
        assert_eq!(exact.total_pages(), 2);
        assert!(!exact.has_more());
    }
}
