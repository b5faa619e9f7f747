//! Cart page, cart mutation fragments, and the checkout handoff.
//!
//! Mutations are HTMX form posts. Each one loads the session cart, applies a
//! single cart operation, saves the snapshot back, and answers with the
//! fragment the client swaps in. Responses that change the item count carry
//! an `HX-Trigger: cart-updated` header so the header badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use telar_core::cart::{Cart, CartItem};
use telar_core::checkout::{order_message, whatsapp_link, OrderSummary};
use telar_core::types::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;
use crate::cart as cart_store;

/// Event name fired to the client after a count-changing mutation.
const CART_UPDATED_EVENT: &str = "cart-updated";

// =============================================================================
// View models
// =============================================================================

/// One cart line as rendered in the cart fragment.
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// The whole cart as rendered on the cart page and in the items fragment.
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total_items: u32,
    pub subtotal: String,
    pub shipping: String,
    pub shipping_is_free: bool,
    pub total: String,
    pub remaining_for_free_shipping: Option<String>,
}

impl CartView {
    fn build(cart: &Cart, state: &AppState) -> Self {
        let policy = &state.config().shipping;
        let summary = OrderSummary::compute(cart, policy);

        Self {
            lines: cart
                .lines()
                .iter()
                .map(|line| CartLineView {
                    product_id: line.product_id.to_string(),
                    name: line.name.clone(),
                    slug: line.slug.clone(),
                    image: line.image_path.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price.display(),
                    line_total: line.line_total().display(),
                })
                .collect(),
            total_items: cart.total_items(),
            subtotal: summary.subtotal.display(),
            shipping: summary.shipping.display(),
            shipping_is_free: summary.shipping.is_zero(),
            total: summary.total.display(),
            remaining_for_free_shipping: summary
                .remaining_for_free_shipping(policy)
                .map(|p| p.display()),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Full cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartPageTemplate {
    pub cart: CartView,
    pub free_shipping_from: String,
}

/// Cart items fragment, swapped in after a mutation.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub total_items: u32,
}

// =============================================================================
// Forms
// =============================================================================

/// Form body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    pub product_id: ProductId,
}

/// Form body for setting a line's quantity.
///
/// Quantity is accepted as a signed number so a client that decrements past
/// zero posts successfully instead of failing deserialization; the handler
/// clamps it.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Form body for removing a line.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub product_id: ProductId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = cart_store::load(&session).await;
    CartPageTemplate {
        cart: CartView::build(&cart, &state),
        free_shipping_from: state.config().shipping.free_threshold.display(),
    }
}

/// Add one unit of a product to the cart.
///
/// The product is re-read from the catalog so the cart snapshots current
/// name, price, and primary image. Unknown or inactive products are a 404.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddForm>,
) -> Result<Response> {
    let repo = ProductRepository::new(state.pool());

    let product = repo
        .get_active_by_id(form.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("producto {}", form.product_id)))?;

    let image_path = repo.primary_image(product.id).await.unwrap_or_else(|e| {
        tracing::warn!("failed to load primary image for cart add: {e}");
        None
    });

    let mut cart = cart_store::load(&session).await;
    cart.add(CartItem {
        product_id: product.id,
        name: product.name,
        slug: product.slug,
        unit_price: product.price,
        image_path,
    });
    cart_store::save(&session, &cart).await;

    Ok(with_cart_updated(CartCountTemplate {
        total_items: cart.total_items(),
    }))
}

/// Set a line's quantity. Zero or below removes the line.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateForm>,
) -> Response {
    let mut cart = cart_store::load(&session).await;
    cart.set_quantity(form.product_id, normalize_quantity(form.quantity));
    cart_store::save(&session, &cart).await;

    with_cart_updated(CartItemsTemplate {
        cart: CartView::build(&cart, &state),
    })
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveForm>,
) -> Response {
    let mut cart = cart_store::load(&session).await;
    cart.remove(form.product_id);
    cart_store::save(&session, &cart).await;

    with_cart_updated(CartItemsTemplate {
        cart: CartView::build(&cart, &state),
    })
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let mut cart = cart_store::load(&session).await;
    cart.clear();
    cart_store::save(&session, &cart).await;

    with_cart_updated(CartItemsTemplate {
        cart: CartView::build(&cart, &state),
    })
}

/// Serve the cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = cart_store::load(&session).await;
    CartCountTemplate {
        total_items: cart.total_items(),
    }
}

/// Hand the order off to WhatsApp.
///
/// Renders the cart as an order message, embeds it in a `wa.me` deep link,
/// and redirects the shopper there. An empty cart goes back to the cart page
/// instead; there is nothing to order.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Response {
    let cart = cart_store::load(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let config = state.config();
    let message = order_message(&cart, &config.shipping);
    let link = whatsapp_link(&config.whatsapp_number, &message);

    Redirect::to(&link).into_response()
}

/// Render a fragment with the `cart-updated` trigger header attached.
fn with_cart_updated(template: impl IntoResponse) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(value) = CART_UPDATED_EVENT.parse() {
        headers.insert("HX-Trigger", value);
    }
    (headers, template).into_response()
}

/// Clamp a posted quantity into the cart's range. Negative values mean
/// remove, same as zero.
fn normalize_quantity(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::normalize_quantity;

    #[test]
    fn negative_quantity_removes_instead_of_erroring() {
        assert_eq!(normalize_quantity(-1), 0);
        assert_eq!(normalize_quantity(i64::MIN), 0);
    }

    #[test]
    fn in_range_quantities_pass_through() {
        assert_eq!(normalize_quantity(0), 0);
        assert_eq!(normalize_quantity(2), 2);
    }

    #[test]
    fn oversized_quantity_saturates() {
        assert_eq!(normalize_quantity(i64::from(u32::MAX) + 10), u32::MAX);
    }
}
