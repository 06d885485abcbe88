//! Shopping cart state.
//!
//! A [`Cart`] only stores product ids and quantities. Totals are derived on
//! every read, and prices come from the [`Catalog`] at that moment, so a price
//! change is reflected immediately in the cart total.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    catalog::Catalog,
    models::{Product, ProductId},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Ordered cart lines, at most one per product, every quantity >= 1.
///
/// Serializes as a plain list of `{productId, quantity}` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self::from_lines(lines)
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from stored lines. Lines with a non-positive quantity
    /// are dropped and repeated products are merged into the first line.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_quantity(line.product_id, line.quantity);
        }
        cart
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: ProductId) -> Option<i32> {
        self.line(product_id).map(|line| line.quantity)
    }

    /// Adds `quantity` units of `product`, merging into an existing line.
    /// A quantity below 1 does nothing.
    pub fn add_item(&mut self, product: &Product, quantity: i32) {
        self.add_quantity(product.id, quantity);
    }

    pub fn remove_item(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// Sets the quantity of an existing line. Zero or less removes it; an
    /// unknown product is ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|line| i64::from(line.quantity)).sum()
    }

    /// Sum of quantity times the current catalog price. Lines whose product
    /// is gone from the catalog count as zero.
    pub fn total_price(&self, catalog: &Catalog) -> i64 {
        self.lines
            .iter()
            .filter_map(|line| {
                catalog
                    .get(line.product_id)
                    .map(|product| product.price * i64::from(line.quantity))
            })
            .sum()
    }

    fn add_quantity(&mut self, product_id: ProductId, quantity: i32) {
        if quantity < 1 {
            return;
        }
        match self.line_mut(product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id,
                quantity,
            }),
        }
    }

    fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}
