//! Category management handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use telar_core::catalog::Category;
use telar_core::types::CategoryId;

use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::forms::CategoryForm;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Category listing row with its product count.
pub struct CategoryRowView {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub active: bool,
    pub product_count: i64,
}

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesTemplate {
    pub categories: Vec<CategoryRowView>,
}

/// Category form template, used for both create and edit.
#[derive(Template, WebTemplate)]
#[template(path = "categories/form.html")]
pub struct CategoryFormTemplate {
    /// Empty for a new category, the id when editing.
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub hero_image: String,
    pub errors: Vec<String>,
}

impl CategoryFormTemplate {
    fn blank() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            hero_image: String::new(),
            errors: Vec::new(),
        }
    }

    fn for_category(category: &Category) -> Self {
        Self {
            id: Some(category.id.to_string()),
            name: category.name.clone(),
            description: category.description.clone().unwrap_or_default(),
            hero_image: category.hero_image.clone().unwrap_or_default(),
            errors: Vec::new(),
        }
    }

    fn with_input(id: Option<String>, form: &CategoryForm, errors: Vec<String>) -> Self {
        Self {
            id,
            name: form.name.clone(),
            description: form.description.clone(),
            hero_image: form.hero_image.clone(),
            errors,
        }
    }
}

/// Display the category listing.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
) -> Result<impl IntoResponse> {
    let repo = CategoryRepository::new(state.pool());
    let categories = repo.list_all().await?;

    let mut rows = Vec::with_capacity(categories.len());
    for category in categories {
        let product_count = repo.product_count(category.id).await?;
        rows.push(CategoryRowView {
            id: category.id.to_string(),
            name: category.name,
            slug: category.slug,
            active: category.active,
            product_count,
        });
    }

    Ok(CategoriesTemplate { categories: rows })
}

/// Display the new-category form.
#[instrument(skip(_admin))]
pub async fn new(_admin: RequireAdminAuth) -> impl IntoResponse {
    CategoryFormTemplate::blank()
}

/// Create a category.
#[instrument(skip(state, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(CategoryFormTemplate::with_input(None, &form, errors).into_response());
        }
    };

    match CategoryRepository::new(state.pool())
        .create(
            &valid.name,
            &valid.slug,
            valid.description.as_deref(),
            valid.hero_image.as_deref(),
        )
        .await
    {
        Ok(category) => {
            tracing::info!(slug = %category.slug, "category created");
            Ok(Redirect::to("/categorias").into_response())
        }
        Err(RepositoryError::Duplicate(_)) => Ok(CategoryFormTemplate::with_input(
            None,
            &form,
            vec!["Ya existe una categoría con ese nombre.".to_owned()],
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Display the edit form for a category.
#[instrument(skip(state, _admin))]
pub async fn edit(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("categoría {id}")))?;

    Ok(CategoryFormTemplate::for_category(&category))
}

/// Update a category.
#[instrument(skip(state, _admin, form))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Response> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return Ok(
                CategoryFormTemplate::with_input(Some(id.to_string()), &form, errors)
                    .into_response(),
            );
        }
    };

    match CategoryRepository::new(state.pool())
        .update(
            id,
            &valid.name,
            &valid.slug,
            valid.description.as_deref(),
            valid.hero_image.as_deref(),
        )
        .await
    {
        Ok(Some(_)) => Ok(Redirect::to("/categorias").into_response()),
        Ok(None) => Err(AppError::NotFound(format!("categoría {id}"))),
        Err(RepositoryError::Duplicate(_)) => Ok(CategoryFormTemplate::with_input(
            Some(id.to_string()),
            &form,
            vec!["Ya existe una categoría con ese nombre.".to_owned()],
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Flip a category's active flag.
///
/// Deactivating hides the category and its listing from the storefront;
/// products keep their assignment.
#[instrument(skip(state, _admin))]
pub async fn toggle(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<Redirect> {
    let active = CategoryRepository::new(state.pool())
        .toggle_active(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("categoría {id}")))?;

    tracing::info!(%id, active, "category toggled");
    Ok(Redirect::to("/categorias"))
}

/// Delete a category. Refused while products are still assigned to it.
#[instrument(skip(state, _admin))]
pub async fn delete(
    State(state): State<AppState>,
    _admin: RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<Redirect> {
    match CategoryRepository::new(state.pool()).delete(id).await {
        Ok(true) => {
            tracing::info!(%id, "category deleted");
            Ok(Redirect::to("/categorias"))
        }
        Ok(false) => Err(AppError::NotFound(format!("categoría {id}"))),
        Err(RepositoryError::StillReferenced(_)) => Err(AppError::BadRequest(
            "La categoría todavía tiene productos asignados.".to_owned(),
        )),
        Err(e) => Err(e.into()),
    }
}
