//! Product management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use telar_core::catalog::{Category, Product, ProductImage};
use telar_core::types::{CategoryId, ProductId, ProductImageId};

use crate::db::products::ProductInput;
use crate::db::{CategoryRepository, ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::{ImageForm, ProductForm};
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
}

/// One row of the product listing.
pub struct ProductRowView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub price: String,
    pub active: bool,
    pub category_name: String,
    pub image_count: i64,
}

/// Product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsTemplate {
    pub query: String,
    pub products: Vec<ProductRowView>,
    pub total_count: u32,
    pub page: u32,
    pub total_pages: u32,
}

/// Category choice in the product form's select.
pub struct CategoryOption {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

/// Gallery image in the product form.
pub struct ImageRowView {
    pub id: String,
    pub file_path: String,
}

/// Product form template, used for both create and edit.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    /// Empty for a new product, the id when editing.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: String,
    pub compare_at_price: String,
    pub categories: Vec<CategoryOption>,
    pub images: Vec<ImageRowView>,
    pub errors: Vec<String>,
}

/// Display the product listing.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse> {
    let page = params.page.unwrap_or(1).max(1);
    let listing = ProductRepository::new(state.pool())
        .list(params.q.as_deref(), page)
        .await?;

    let total_pages = listing.total_pages();
    Ok(ProductsTemplate {
        query: params.q.unwrap_or_default(),
        products: listing
            .items
            .into_iter()
            .map(|row| ProductRowView {
                id: row.id.to_string(),
                name: row.name,
                slug: row.slug,
                price: row.price.display(),
                active: row.active,
                category_name: row.category_name,
                image_count: row.image_count,
            })
            .collect(),
        total_count: listing.total_count,
        page: listing.page,
        total_pages,
    })
}

/// Display the new-product form.
#[instrument(skip(state, _admin))]
pub async fn new(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool()).list_all().await?;

    Ok(ProductFormTemplate {
        id: None,
        name: String::new(),
        description: String::new(),
        price: String::new(),
        compare_at_price: String::new(),
        categories: category_options(&categories, None),
        images: Vec::new(),
        errors: Vec::new(),
    })
}

/// Create a product.
#[instrument(skip(state, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return render_with_errors(&state, None, &form, errors).await,
    };

    ensure_category_exists(&state, valid.category_id).await?;

    let input = ProductInput {
        name: &valid.name,
        slug: &valid.slug,
        description: &valid.description,
        price: valid.price,
        compare_at_price: valid.compare_at_price,
        category_id: valid.category_id,
    };

    match ProductRepository::new(state.pool()).create(&input).await {
        Ok(product) => {
            tracing::info!(slug = %product.slug, "product created");
            Ok(Redirect::to(&format!("/productos/{}", product.id)).into_response())
        }
        Err(RepositoryError::Duplicate(_)) => {
            render_with_errors(
                &state,
                None,
                &form,
                vec!["Ya existe un producto con ese nombre.".to_owned()],
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the edit form for a product, including its gallery.
#[instrument(skip(state, _admin))]
pub async fn edit(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;
    let images = repo.images(id).await?;
    let categories = CategoryRepository::new(state.pool()).list_all().await?;

    Ok(form_for_product(&product, &categories, &images))
}

/// Update a product.
#[instrument(skip(state, _admin, form))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return render_with_errors(&state, Some(id), &form, errors).await,
    };

    ensure_category_exists(&state, valid.category_id).await?;

    let input = ProductInput {
        name: &valid.name,
        slug: &valid.slug,
        description: &valid.description,
        price: valid.price,
        compare_at_price: valid.compare_at_price,
        category_id: valid.category_id,
    };

    match ProductRepository::new(state.pool()).update(id, &input).await {
        Ok(Some(_)) => Ok(Redirect::to("/productos").into_response()),
        Ok(None) => Err(AppError::NotFound(format!("producto {id}"))),
        Err(RepositoryError::Duplicate(_)) => {
            render_with_errors(
                &state,
                Some(id),
                &form,
                vec!["Ya existe un producto con ese nombre.".to_owned()],
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

/// Flip a product's active flag.
#[instrument(skip(state, _admin))]
pub async fn toggle(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let active = ProductRepository::new(state.pool())
        .toggle_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;

    tracing::info!(%id, active, "product toggled");
    Ok(Redirect::to("/productos"))
}

/// Delete a product and its gallery.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<ProductId>,
) -> Result<Redirect> {
    let deleted = ProductRepository::new(state.pool()).delete(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("producto {id}")));
    }

    tracing::info!(%id, "product deleted");
    Ok(Redirect::to("/productos"))
}

/// Add a gallery image to a product.
#[instrument(skip(state, _admin, form))]
pub async fn add_image(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ImageForm>,
) -> Result<Redirect> {
    let file_path = form
        .validate()
        .map_err(|errors| AppError::BadRequest(errors.join(" ")))?;

    let repo = ProductRepository::new(state.pool());
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {id}")))?;
    repo.add_image(id, &file_path).await?;

    Ok(Redirect::to(&format!("/productos/{id}")))
}

/// Remove a gallery image from a product.
#[instrument(skip(state, _admin))]
pub async fn remove_image(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path((id, image_id)): Path<(ProductId, ProductImageId)>,
) -> Result<Redirect> {
    let removed = ProductRepository::new(state.pool())
        .remove_image(id, image_id)
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!("imagen {image_id}")));
    }

    Ok(Redirect::to(&format!("/productos/{id}")))
}

// =============================================================================
// Helpers
// =============================================================================

fn category_options(categories: &[Category], selected: Option<CategoryId>) -> Vec<CategoryOption> {
    categories
        .iter()
        .map(|c| CategoryOption {
            id: c.id.to_string(),
            name: c.name.clone(),
            selected: Some(c.id) == selected,
        })
        .collect()
}

fn form_for_product(
    product: &Product,
    categories: &[Category],
    images: &[ProductImage],
) -> ProductFormTemplate {
    ProductFormTemplate {
        id: Some(product.id.to_string()),
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price.as_minor().to_string(),
        compare_at_price: product
            .compare_at_price
            .map(|p| p.as_minor().to_string())
            .unwrap_or_default(),
        categories: category_options(categories, Some(product.category_id)),
        images: images
            .iter()
            .map(|img| ImageRowView {
                id: img.id.to_string(),
                file_path: img.file_path.clone(),
            })
            .collect(),
        errors: Vec::new(),
    }
}

/// Re-render the form with the submitted values and validation errors.
async fn render_with_errors(
    state: &AppState,
    id: Option<ProductId>,
    form: &ProductForm,
    errors: Vec<String>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());
    let categories = CategoryRepository::new(state.pool()).list_all().await?;
    let images = match id {
        Some(id) => repo.images(id).await?,
        None => Vec::new(),
    };

    Ok(ProductFormTemplate {
        id: id.map(|id| id.to_string()),
        name: form.name.clone(),
        description: form.description.clone(),
        price: form.price.to_string(),
        compare_at_price: form
            .compare_at_price
            .map(|p| p.to_string())
            .unwrap_or_default(),
        categories: category_options(&categories, Some(form.category_id)),
        images: images
            .iter()
            .map(|img| ImageRowView {
                id: img.id.to_string(),
                file_path: img.file_path.clone(),
            })
            .collect(),
        errors,
    }
    .into_response())
}

/// Reject product writes that point at a nonexistent category.
async fn ensure_category_exists(state: &AppState, category_id: CategoryId) -> Result<()> {
    CategoryRepository::new(state.pool())
        .get(category_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("La categoría seleccionada no existe.".to_owned()))?;
    Ok(())
}
