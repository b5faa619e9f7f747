//! The shopping cart store.
//!
//! A [`Cart`] is the authoritative client-side record of what the shopper
//! intends to order, independent of server state. Name and price are
//! snapshotted when a line is added; later catalog edits do not reach lines
//! already in the cart.
//!
//! Every operation is a total function: bad input normalizes to a no-op
//! instead of an error, because nothing in the cart path is allowed to take
//! the page down. Persistence is a collaborator's job (the storefront session
//! adapter), not this type's.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One product-id/quantity pairing within a cart.
///
/// Invariants, maintained by [`Cart`]:
/// - `quantity >= 1`; a line that would drop to zero is removed instead
/// - at most one line per product id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub unit_price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub quantity: u32,
}

impl CartLine {
    /// Price of this line: unit price times quantity.
    #[must_use]
    pub const fn line_total(&self) -> Price {
        self.unit_price.saturating_mul(self.quantity)
    }
}

/// Input for [`Cart::add`]: the product fields the cart snapshots.
#[derive(Debug, Clone)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub slug: String,
    pub unit_price: Price,
    pub image_path: Option<String>,
}

/// An ordered sequence of cart lines. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of a product.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line is appended with quantity 1, snapshotting the
    /// product's name and price at add time.
    pub fn add(&mut self, item: CartItem) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(CartLine {
            product_id: item.product_id,
            name: item.name,
            slug: item.slug,
            unit_price: item.unit_price,
            image_path: item.image_path,
            quantity: 1,
        });
    }

    /// Set a line's quantity in place, preserving its position.
    ///
    /// A quantity of zero removes the line. Unknown ids are a no-op.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    /// Drop the line for a product. No-op when absent.
    pub fn remove(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines
            .iter()
            .fold(Price::ZERO, |total, line| {
                total.saturating_add(line.line_total())
            })
    }
}

impl<'de> Deserialize<'de> for Cart {
    /// Deserialize a persisted snapshot, sanitizing instead of failing.
    ///
    /// Snapshots come from durable client-side storage and may be stale or
    /// hand-edited: zero-quantity lines are dropped and duplicate product ids
    /// are merged into the first occurrence, so a corrupt-but-parseable
    /// snapshot degrades to a valid cart.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Vec::<CartLine>::deserialize(deserializer)?;
        let mut cart = Self::new();

        for line in raw {
            if line.quantity == 0 {
                continue;
            }
            if let Some(existing) = cart
                .lines
                .iter_mut()
                .find(|l| l.product_id == line.product_id)
            {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            } else {
                cart.lines.push(line);
            }
        }

        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: ProductId, name: &str, price: i64) -> CartItem {
        CartItem {
            product_id: id,
            name: name.to_owned(),
            slug: crate::slug::slugify(name),
            unit_price: Price::from_minor(price),
            image_path: None,
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let id = ProductId::random();
        let mut cart = Cart::new();
        cart.add(item(id, "Cojín", 1_000));
        cart.add(item(id, "Cojín", 1_000));

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal().as_minor(), 2_000);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn add_snapshots_price_at_add_time() {
        let id = ProductId::random();
        let mut cart = Cart::new();
        cart.add(item(id, "Cojín", 1_000));
        // A later add with a changed catalog price only bumps the quantity.
        cart.add(item(id, "Cojín", 9_999));

        assert_eq!(cart.lines()[0].unit_price.as_minor(), 1_000);
        assert_eq!(cart.subtotal().as_minor(), 2_000);
    }

    #[test]
    fn set_quantity_zero_equals_remove() {
        let id = ProductId::random();

        let mut by_zero = Cart::new();
        by_zero.add(item(id, "Cojín", 1_000));
        by_zero.set_quantity(id, 0);

        let mut by_remove = Cart::new();
        by_remove.add(item(id, "Cojín", 1_000));
        by_remove.remove(id);

        assert_eq!(by_zero, by_remove);
        assert!(by_zero.is_empty());
    }

    #[test]
    fn set_quantity_preserves_line_position() {
        let first = ProductId::random();
        let second = ProductId::random();
        let mut cart = Cart::new();
        cart.add(item(first, "Cojín", 1_000));
        cart.add(item(second, "Manta", 2_000));

        cart.set_quantity(first, 5);

        assert_eq!(cart.lines()[0].product_id, first);
        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.lines()[1].product_id, second);
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let mut cart = Cart::new();
        cart.add(item(ProductId::random(), "Cojín", 1_000));
        cart.remove(ProductId::random());
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn zero_price_items_contribute_nothing() {
        let mut cart = Cart::new();
        cart.add(item(ProductId::random(), "Muestra gratis", 0));
        cart.add(item(ProductId::random(), "Cojín", 1_000));
        assert_eq!(cart.subtotal().as_minor(), 1_000);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn clear_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add(item(ProductId::random(), "Cojín", 1_000));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn snapshot_round_trip_preserves_ids_quantities_and_order() {
        let mut cart = Cart::new();
        cart.add(item(ProductId::random(), "Cojín", 1_000));
        cart.add(item(ProductId::random(), "Manta", 2_000));
        cart.set_quantity(cart.lines()[0].product_id, 3);

        let json = serde_json::to_string(&cart).expect("serialize");
        let restored: Cart = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(restored, cart);
    }

    #[test]
    fn deserialize_drops_zero_quantity_lines() {
        let id = ProductId::random();
        let json = format!(
            r#"[{{"product_id":"{id}","name":"Cojín","slug":"cojin","unit_price":1000,"quantity":0}}]"#
        );
        let cart: Cart = serde_json::from_str(&json).expect("deserialize");
        assert!(cart.is_empty());
    }

    #[test]
    fn deserialize_merges_duplicate_product_ids() {
        let id = ProductId::random();
        let json = format!(
            r#"[{{"product_id":"{id}","name":"Cojín","slug":"cojin","unit_price":1000,"quantity":1}},
                {{"product_id":"{id}","name":"Cojín","slug":"cojin","unit_price":1000,"quantity":2}}]"#
        );
        let cart: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total_items(), 3);
    }
}
