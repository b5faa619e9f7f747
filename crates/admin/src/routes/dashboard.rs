//! Dashboard overview handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_name: String,
    pub category_count: i64,
    pub product_count: i64,
    pub active_product_count: i64,
}

/// Display the dashboard with catalog counts.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> impl IntoResponse {
    let category_count = count(state.pool(), "SELECT COUNT(*) FROM catalog.category").await;
    let product_count = count(state.pool(), "SELECT COUNT(*) FROM catalog.product").await;
    let active_product_count = count(
        state.pool(),
        "SELECT COUNT(*) FROM catalog.product WHERE active = TRUE",
    )
    .await;

    DashboardTemplate {
        admin_name: admin.name,
        category_count,
        product_count,
        active_product_count,
    }
}

/// Run a count query, degrading to zero on failure.
async fn count(pool: &sqlx::PgPool, sql: &str) -> i64 {
    match sqlx::query_scalar::<_, i64>(sql).fetch_one(pool).await {
        Ok(n) => n,
        Err(e) => {
            tracing::error!("dashboard count failed: {e}");
            0
        }
    }
}
