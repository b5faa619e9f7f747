//! Search page and incremental results fragment.
//!
//! The search page renders a full document; as the shopper types, the client
//! re-requests `/buscar/resultados` tagged with a per-page-view token and a
//! sequence number that increases within that view. Responses can complete
//! out of order, so the fragment handler keeps a [`SequenceGate`] in the
//! session and replies `204 No Content` to anything stale. The client swaps
//! nothing on a 204, which means a slow response for an old keystroke can
//! never overwrite newer results. A fresh view token (reload, second tab)
//! resets the gate, so the counter restarting at 1 is never mistaken for
//! staleness.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use telar_core::catalog::{CatalogFilter, Page};
use telar_core::search::SequenceGate;

use crate::db::{CategoryRepository, ProductRepository};
use crate::filters;
use crate::state::AppState;

use super::home::CategoryCardView;
use super::{PaginationView, ProductCardView};

/// Session key holding the search sequence gate.
const SEARCH_GATE_KEY: &str = "telar.search_gate";

/// Query parameters accepted by the search page and fragment.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub categoria: Option<String>,
    pub sort: Option<String>,
    pub page: Option<u32>,
    /// Client-issued sequence number, fragment requests only.
    pub seq: Option<u64>,
    /// Token for the page view that issued the sequence.
    pub view: Option<String>,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/index.html")]
pub struct SearchTemplate {
    pub query: String,
    pub category_slug: String,
    pub sort: &'static str,
    pub categories: Vec<CategoryCardView>,
    pub results: ResultsTemplate,
    pub free_shipping_from: String,
}

/// Search results fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct ResultsTemplate {
    pub query: String,
    pub products: Vec<ProductCardView>,
    pub total_count: u32,
    pub pagination: PaginationView,
}

/// Display the search page with the initial result set.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    let filter = CatalogFilter::from_params(
        params.q.as_deref(),
        params.categoria.as_deref(),
        params.sort.as_deref(),
        params.page,
    );

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
            tracing::error!("failed to load categories for search: {e}");
            Vec::new()
        }
    };

    let results = run_search(&state, &filter).await;

    SearchTemplate {
        query: filter.query.clone().unwrap_or_default(),
        category_slug: filter.category_slug.clone().unwrap_or_default(),
        sort: filter.sort.as_str(),
        categories,
        results,
        free_shipping_from: state.config().shipping.free_threshold.display(),
    }
}

/// Serve the search results fragment, discarding stale requests.
///
/// A request whose `seq` is below the highest already answered for its page
/// view gets a `204 No Content`; the client leaves the current results in
/// place. Requests without a `seq` (direct navigation, no JS) always render.
#[instrument(skip(state, session))]
pub async fn results(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchQuery>,
) -> Response {
    if let Some(seq) = params.seq {
        let view = params.view.as_deref().unwrap_or_default();
        if !observe_sequence(&session, view, seq).await {
            tracing::debug!(seq, view, "discarding stale search request");
            return StatusCode::NO_CONTENT.into_response();
        }
    }

    let filter = CatalogFilter::from_params(
        params.q.as_deref(),
        params.categoria.as_deref(),
        params.sort.as_deref(),
        params.page,
    );

    run_search(&state, &filter).await.into_response()
}

/// Run the catalog query for a filter and shape the results fragment.
///
/// Query failures degrade to an empty result set so the search box keeps
/// working through a transient database fault.
async fn run_search(state: &AppState, filter: &CatalogFilter) -> ResultsTemplate {
    let scope = state.category_scope(filter.category_slug.as_deref()).await;

    let page = match ProductRepository::new(state.pool()).search(filter, scope).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("search query failed: {e}");
            Page::empty(filter.page)
        }
    };

    let pagination = PaginationView::build("/buscar", filter, page.total_pages());

    ResultsTemplate {
        query: filter.query.clone().unwrap_or_default(),
        products: page.items.into_iter().map(ProductCardView::from).collect(),
        total_count: page.total_count,
        pagination,
    }
}

/// Run a client-issued sequence through the session's [`SequenceGate`].
///
/// Returns whether the request may render; current requests record the
/// advanced gate back into the session. Session read or write failures let
/// the request through; dropping a result over a storage fault is worse than
/// a rare double render.
async fn observe_sequence(session: &Session, view: &str, seq: u64) -> bool {
    let prior = match session.get::<SequenceGate>(SEARCH_GATE_KEY).await {
        Ok(prior) => prior,
        Err(e) => {
            tracing::warn!("failed to read search sequence gate: {e}");
            return true;
        }
    };

    let (gate, current) = SequenceGate::observe(prior, view, seq);
    if current {
        if let Err(e) = session.insert(SEARCH_GATE_KEY, &gate).await {
            tracing::warn!("failed to record search sequence gate: {e}");
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::observe_sequence;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn stale_sequences_within_a_view_are_discarded() {
        let session = session();
        assert!(observe_sequence(&session, "view-a", 1).await);
        assert!(observe_sequence(&session, "view-a", 3).await);
        assert!(!observe_sequence(&session, "view-a", 2).await);
    }

    #[tokio::test]
    async fn reload_restarts_the_counter_without_bricking_search() {
        let session = session();

        // Sequences climb during the first visit.
        assert!(observe_sequence(&session, "view-a", 5).await);

        // A reload restarts the client counter at 1; the first keystroke of
        // the new page must render, not be discarded against the old mark.
        assert!(observe_sequence(&session, "view-b", 1).await);
        assert!(observe_sequence(&session, "view-b", 2).await);
        assert!(!observe_sequence(&session, "view-b", 1).await);
    }

    #[tokio::test]
    async fn two_tabs_sharing_a_session_both_keep_rendering() {
        let session = session();
        assert!(observe_sequence(&session, "tab-a", 4).await);
        assert!(observe_sequence(&session, "tab-b", 1).await);
        assert!(observe_sequence(&session, "tab-a", 5).await);
    }
}
