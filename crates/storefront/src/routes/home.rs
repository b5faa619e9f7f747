//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use telar_core::marquee::{ARROW_RESUME_DELAY, POINTER_RESUME_DELAY};

use crate::db::{CategoryRepository, ProductRepository};
use crate::filters;
use crate::state::AppState;

use super::ProductCardView;

/// Products shown in the best-sellers strip.
const STRIP_SIZE: u32 = 8;

/// Category display data for templates.
#[derive(Clone)]
pub struct CategoryCardView {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub hero_image: Option<String>,
}

/// Home page template.
///
/// The marquee resume delays are rendered as data attributes so the scroll
/// script picks up the same timings the state machine is tested against.
#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryCardView>,
    pub newest: Vec<ProductCardView>,
    pub pointer_resume_ms: u64,
    pub arrow_resume_ms: u64,
    pub free_shipping_from: String,
}

/// Display the home page.
///
/// Catalog read failures degrade to empty sections; the home page never 500s
/// over a missing strip.
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
            tracing::error!("failed to load categories for home: {e}");
            Vec::new()
        }
    };

    let newest = match ProductRepository::new(state.pool()).newest(STRIP_SIZE).await {
        Ok(products) => products.into_iter().map(ProductCardView::from).collect(),
        Err(e) => {
            tracing::error!("failed to load newest products for home: {e}");
            Vec::new()
        }
    };

    HomeTemplate {
        categories,
        newest,
        pointer_resume_ms: delay_ms(POINTER_RESUME_DELAY),
        arrow_resume_ms: delay_ms(ARROW_RESUME_DELAY),
        free_shipping_from: state.config().shipping.free_threshold.display(),
    }
}

fn delay_ms(delay: std::time::Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use askama::Template;
    use telar_core::types::Price;

    use super::*;

    #[test]
    fn announcement_banner_shows_the_configured_threshold() {
        let template = HomeTemplate {
            categories: Vec::new(),
            newest: Vec::new(),
            pointer_resume_ms: delay_ms(POINTER_RESUME_DELAY),
            arrow_resume_ms: delay_ms(ARROW_RESUME_DELAY),
            free_shipping_from: Price::from_minor(70_000).display(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("Envío gratis desde $ 70.000"));
    }

    #[test]
    fn marquee_delays_are_rendered_as_data_attributes() {
        let template = HomeTemplate {
            categories: Vec::new(),
            newest: Vec::new(),
            pointer_resume_ms: delay_ms(POINTER_RESUME_DELAY),
            arrow_resume_ms: delay_ms(ARROW_RESUME_DELAY),
            free_shipping_from: Price::from_minor(50_000).display(),
        };

        let html = template.render().unwrap();
        assert!(html.contains("data-marquee-pointer-delay=\"1500\""));
        assert!(html.contains("data-marquee-arrow-delay=\"2000\""));
    }
}
