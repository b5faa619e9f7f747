//! Product detail page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Image display data for templates.
#[derive(Clone)]
pub struct ImageView {
    pub url: String,
}

/// Product detail display data.
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub images: Vec<ImageView>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: ProductView,
    pub free_shipping_from: String,
}

/// Display the product detail page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());

    let product = repo
        .get_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {slug}")))?;

    // A product without images still renders; the gallery is just empty.
    let images = match repo.images(product.id).await {
        Ok(images) => images
            .into_iter()
            .map(|img| ImageView { url: img.file_path })
            .collect(),
        Err(e) => {
            tracing::error!("failed to load images for {slug}: {e}");
            Vec::new()
        }
    };

    Ok(ProductShowTemplate {
        product: ProductView {
            id: product.id.to_string(),
            name: product.name,
            description: product.description,
            price: product.price.display(),
            compare_at_price: product.compare_at_price.map(|p| p.display()),
            images,
        },
        free_shipping_from: state.config().shipping.free_threshold.display(),
    })
}
