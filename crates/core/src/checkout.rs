//! Shipping quote and WhatsApp order handoff.
//!
//! Checkout is an out-of-band handoff: the cart is rendered as a
//! human-readable order message and embedded in a `wa.me` deep link that the
//! shopper opens to finish the order over WhatsApp. Everything here is pure;
//! the storefront only supplies the cart and the configured policy.

use crate::cart::Cart;
use crate::types::Price;

/// Shipping fee policy: a flat fee waived above a cart subtotal threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotal at or above which shipping is free.
    pub free_threshold: Price,
    /// Flat fee charged below the threshold.
    pub flat_fee: Price,
}

impl Default for ShippingPolicy {
    /// The store's standing offer: free shipping from $ 50.000, else $ 15.000.
    fn default() -> Self {
        Self {
            free_threshold: Price::from_minor(50_000),
            flat_fee: Price::from_minor(15_000),
        }
    }
}

impl ShippingPolicy {
    /// The shipping fee for a given cart subtotal.
    #[must_use]
    pub fn quote(&self, subtotal: Price) -> Price {
        if subtotal >= self.free_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Derived order totals for display and for the handoff message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
}

impl OrderSummary {
    /// Compute the summary for a cart under a shipping policy.
    #[must_use]
    pub fn compute(cart: &Cart, policy: &ShippingPolicy) -> Self {
        let subtotal = cart.subtotal();
        let shipping = policy.quote(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal.saturating_add(shipping),
        }
    }

    /// How much more the shopper must add to reach free shipping, if any.
    #[must_use]
    pub fn remaining_for_free_shipping(&self, policy: &ShippingPolicy) -> Option<Price> {
        if self.subtotal >= policy.free_threshold {
            None
        } else {
            Some(policy.free_threshold.saturating_sub(self.subtotal))
        }
    }
}

/// Render the order message for a cart, one line per cart line in cart order.
///
/// Same cart and policy always produce the same message.
#[must_use]
pub fn order_message(cart: &Cart, policy: &ShippingPolicy) -> String {
    let summary = OrderSummary::compute(cart, policy);

    let mut message = String::from("¡Hola! Quiero hacer este pedido:\n\n");
    for line in cart.lines() {
        message.push_str(&format!(
            "- {} ×{} — {}\n",
            line.name,
            line.quantity,
            line.line_total().display()
        ));
    }

    message.push_str(&format!("\nSubtotal: {}\n", summary.subtotal.display()));
    if summary.shipping.is_zero() {
        message.push_str("Envío: Gratis\n");
    } else {
        message.push_str(&format!("Envío: {}\n", summary.shipping.display()));
    }
    message.push_str(&format!("Total: {}", summary.total.display()));

    message
}

/// Build the WhatsApp deep link carrying a message.
///
/// The message is percent-encoded so that decoding the link's `text`
/// parameter reproduces it exactly.
#[must_use]
pub fn whatsapp_link(number: &str, message: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        number,
        urlencoding::encode(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::types::ProductId;

    fn cart_with(lines: &[(&str, i64, u32)]) -> Cart {
        let mut cart = Cart::new();
        for &(name, price, quantity) in lines {
            let id = ProductId::random();
            cart.add(CartItem {
                product_id: id,
                name: name.to_owned(),
                slug: crate::slug::slugify(name),
                unit_price: Price::from_minor(price),
                image_path: None,
            });
            cart.set_quantity(id, quantity);
        }
        cart
    }

    #[test]
    fn fee_applies_below_threshold_and_waives_at_it() {
        let policy = ShippingPolicy::default();
        assert_eq!(policy.quote(Price::from_minor(49_999)).as_minor(), 15_000);
        assert_eq!(policy.quote(Price::from_minor(50_000)), Price::ZERO);
        assert_eq!(policy.quote(Price::from_minor(80_000)), Price::ZERO);
    }

    #[test]
    fn adding_an_item_can_cross_the_threshold() {
        let policy = ShippingPolicy {
            free_threshold: Price::from_minor(5_000),
            flat_fee: Price::from_minor(1_500),
        };

        // p1 ×2 at 1.000 plus p2 ×1 at 2.000: subtotal 4.000, fee applies.
        let mut cart = cart_with(&[("p1", 1_000, 2), ("p2", 2_000, 1)]);
        let summary = OrderSummary::compute(&cart, &policy);
        assert_eq!(summary.subtotal.as_minor(), 4_000);
        assert_eq!(summary.shipping.as_minor(), 1_500);

        // Second unit of p2 pushes the subtotal to 6.000: shipping free.
        let p2 = cart.lines()[1].clone();
        cart.add(CartItem {
            product_id: p2.product_id,
            name: p2.name,
            slug: p2.slug,
            unit_price: p2.unit_price,
            image_path: None,
        });
        let summary = OrderSummary::compute(&cart, &policy);
        assert_eq!(summary.subtotal.as_minor(), 6_000);
        assert_eq!(summary.shipping, Price::ZERO);
        assert_eq!(summary.total.as_minor(), 6_000);
    }

    #[test]
    fn remaining_for_free_shipping() {
        let policy = ShippingPolicy::default();
        let cart = cart_with(&[("Cojín", 30_000, 1)]);
        let summary = OrderSummary::compute(&cart, &policy);
        assert_eq!(
            summary.remaining_for_free_shipping(&policy),
            Some(Price::from_minor(20_000))
        );

        let cart = cart_with(&[("Manta", 60_000, 1)]);
        let summary = OrderSummary::compute(&cart, &policy);
        assert_eq!(summary.remaining_for_free_shipping(&policy), None);
    }

    #[test]
    fn message_lists_lines_in_cart_order() {
        let cart = cart_with(&[("Cojín Flores", 50_000, 2), ("Manta Telar", 80_000, 1)]);
        let message = order_message(&cart, &ShippingPolicy::default());

        let first = message.find("Cojín Flores ×2 — $ 100.000").expect("line 1");
        let second = message.find("Manta Telar ×1 — $ 80.000").expect("line 2");
        assert!(first < second);
        assert!(message.contains("Subtotal: $ 180.000"));
        assert!(message.contains("Envío: Gratis"));
        assert!(message.contains("Total: $ 180.000"));
    }

    #[test]
    fn message_shows_fee_below_threshold() {
        let cart = cart_with(&[("Cojín", 20_000, 1)]);
        let message = order_message(&cart, &ShippingPolicy::default());
        assert!(message.contains("Envío: $ 15.000"));
        assert!(message.contains("Total: $ 35.000"));
    }

    #[test]
    fn message_is_deterministic() {
        let cart = cart_with(&[("Cojín", 20_000, 1)]);
        let policy = ShippingPolicy::default();
        assert_eq!(order_message(&cart, &policy), order_message(&cart, &policy));
    }

    #[test]
    fn link_encoding_round_trips() {
        let cart = cart_with(&[("Cojín Flores", 50_000, 2), ("Manta Telar", 80_000, 1)]);
        let message = order_message(&cart, &ShippingPolicy::default());
        let link = whatsapp_link("573166388242", &message);

        assert!(link.starts_with("https://wa.me/573166388242?text="));
        let encoded = link.split("?text=").nth(1).expect("text parameter");
        let decoded = urlencoding::decode(encoded).expect("valid encoding");
        assert_eq!(decoded, message);
    }
}
