//! Session-backed cart persistence adapter.
//!
//! The cart snapshot is stored in the shopper's session under a single key.
//! The contract from the cart's point of view:
//!
//! - loading falls back to an empty cart on any read or deserialize failure,
//!   so a corrupt snapshot never breaks the page;
//! - every mutation is saved back before the handler responds, so a crash
//!   after a mutation loses at most the in-flight write;
//! - save failures are logged and swallowed. Cart usability is never blocked
//!   by a storage fault.

use tower_sessions::Session;

use telar_core::cart::Cart;

/// Session key holding the serialized cart snapshot.
const CART_KEY: &str = "telar.cart";

/// Load the cart from the session, falling back to empty.
pub async fn load(session: &Session) -> Cart {
    match session.get::<Cart>(CART_KEY).await {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!("failed to read cart snapshot, starting empty: {e}");
            Cart::new()
        }
    }
}

/// Persist the cart snapshot. Failures are logged, never propagated.
pub async fn save(session: &Session, cart: &Cart) {
    if let Err(e) = session.insert(CART_KEY, cart).await {
        tracing::warn!("failed to persist cart snapshot: {e}");
    }
}
