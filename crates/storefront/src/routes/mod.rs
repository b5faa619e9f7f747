//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Health check
//!
//! # Catalog
//! GET  /categorias              - Category listing
//! GET  /categorias/{slug}       - Category page (filtered product listing)
//! GET  /productos/{slug}        - Product detail
//! GET  /buscar                  - Search page
//! GET  /buscar/resultados       - Search results fragment (HTMX, sequence-gated)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! POST /cart/add                - Add one unit (returns count badge, triggers cart-updated)
//! POST /cart/update             - Set line quantity (returns cart_items fragment)
//! POST /cart/remove             - Remove line (returns cart_items fragment)
//! POST /cart/clear              - Empty the cart (returns cart_items fragment)
//! GET  /cart/count              - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout                - Redirect to the WhatsApp order deep link
//! ```

pub mod cart;
pub mod categories;
pub mod home;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use telar_core::catalog::CatalogFilter;

use crate::db::products::ProductCard;
use crate::state::AppState;

/// Create the full storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/categorias", get(categories::index))
        .route("/categorias/{slug}", get(categories::show))
        .route("/productos/{slug}", get(products::show))
        .route("/buscar", get(search::index))
        .route("/buscar/resultados", get(search::results))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout))
}

/// Create the cart routes router.
fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

// =============================================================================
// Shared view models
// =============================================================================

/// Product display data for listing templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub name: String,
    pub slug: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub image: Option<String>,
}

impl From<ProductCard> for ProductCardView {
    fn from(card: ProductCard) -> Self {
        Self {
            name: card.name,
            slug: card.slug,
            price: card.price.display(),
            compare_at_price: card.compare_at_price.map(|p| p.display()),
            image: card.primary_image,
        }
    }
}

/// Pagination display data for listing templates.
#[derive(Clone)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PaginationView {
    /// Build pagination links for a listing path and filter.
    #[must_use]
    pub fn build(path: &str, filter: &CatalogFilter, total_pages: u32) -> Self {
        let page = filter.page;
        let prev_href = (page > 1).then(|| listing_href(path, filter, page - 1));
        let next_href = (page < total_pages).then(|| listing_href(path, filter, page + 1));
        Self {
            page,
            total_pages,
            prev_href,
            next_href,
        }
    }
}

/// Render a listing URL for a filter at a given page.
///
/// Parameter order is fixed (q, categoria, sort, page) so equal filters
/// produce equal, shareable URLs.
#[must_use]
pub fn listing_href(path: &str, filter: &CatalogFilter, page: u32) -> String {
    let mut params = Vec::new();
    if let Some(q) = &filter.query {
        params.push(format!("q={}", urlencoding::encode(q)));
    }
    if let Some(slug) = &filter.category_slug {
        params.push(format!("categoria={}", urlencoding::encode(slug)));
    }
    params.push(format!("sort={}", filter.sort.as_str()));
    params.push(format!("page={page}"));
    format!("{path}?{}", params.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use telar_core::catalog::SortKey;

    #[test]
    fn listing_href_is_deterministic_and_encoded() {
        let filter = CatalogFilter {
            query: Some("cojín lino".to_owned()),
            category_slug: Some("cojines".to_owned()),
            sort: SortKey::PriceAsc,
            page: 2,
        };
        assert_eq!(
            listing_href("/buscar", &filter, 3),
            "/buscar?q=coj%C3%ADn%20lino&categoria=cojines&sort=price_asc&page=3"
        );
    }

    #[test]
    fn pagination_edges_have_no_dangling_links() {
        let filter = CatalogFilter::from_params(None, None, None, Some(1));
        let pagination = PaginationView::build("/buscar", &filter, 3);
        assert!(pagination.prev_href.is_none());
        assert!(pagination.next_href.is_some());

        let filter = CatalogFilter::from_params(None, None, None, Some(3));
        let pagination = PaginationView::build("/buscar", &filter, 3);
        assert!(pagination.prev_href.is_some());
        assert!(pagination.next_href.is_none());
    }

    #[test]
    fn zero_pages_yields_no_links() {
        let filter = CatalogFilter::from_params(None, None, None, Some(1));
        let pagination = PaginationView::build("/buscar", &filter, 0);
        assert!(pagination.prev_href.is_none());
        assert!(pagination.next_href.is_none());
    }
}
