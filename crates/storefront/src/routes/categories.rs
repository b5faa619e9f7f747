//! Category listing and category page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use telar_core::catalog::{CatalogFilter, Page};

use crate::db::products::CategoryScope;
use crate::db::{CategoryRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

use super::{PaginationView, ProductCardView};

use super::home::CategoryCardView;

/// Query parameters accepted by the category page.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub categories: Vec<CategoryCardView>,
    pub free_shipping_from: String,
}

/// Category page template: one category's filtered product listing.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub name: String,
    pub description: Option<String>,
    pub hero_image: Option<String>,
    pub query: String,
    pub sort: &'static str,
    pub products: Vec<ProductCardView>,
    pub total_count: u32,
    pub pagination: PaginationView,
    pub free_shipping_from: String,
}

/// Display the category listing.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let categories = match CategoryRepository::new(state.pool()).list_active().await {
        Ok(categories) => categories
            .into_iter()
            .map(|c| CategoryCardView {
                name: c.name,
                slug: c.slug,
                description: c.description,
                hero_image: c.hero_image,
            })
            .collect(),
        Err(e) => {
            tracing::error!("failed to load categories: {e}");
            Vec::new()
        }
    };

    CategoriesIndexTemplate {
        categories,
        free_shipping_from: state.config().shipping.free_threshold.display(),
    }
}

/// Display one category's product listing.
///
/// Unknown slugs are a 404; query failures inside the listing degrade to an
/// empty result set.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .get_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("categoría {slug}")))?;

    // The category is addressed by the path, so the filter itself carries no
    // category slug; the resolved scope is passed to the query directly.
    let filter = CatalogFilter::from_params(
        params.q.as_deref(),
        None,
        params.sort.as_deref(),
        params.page,
    );

    let page = match ProductRepository::new(state.pool())
        .search(&filter, CategoryScope::Only(category.id))
        .await
    {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("category listing query failed: {e}");
            Page::empty(filter.page)
        }
    };

    let path = format!("/categorias/{slug}");
    let pagination = PaginationView::build(&path, &filter, page.total_pages());

    Ok(CategoryShowTemplate {
        name: category.name,
        description: category.description,
        hero_image: category.hero_image,
        query: filter.query.clone().unwrap_or_default(),
        sort: filter.sort.as_str(),
        products: page.items.into_iter().map(ProductCardView::from).collect(),
        total_count: page.total_count,
        pagination,
        free_shipping_from: state.config().shipping.free_threshold.display(),
    })
}
