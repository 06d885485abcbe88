use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    cart::Cart,
    catalog::Catalog,
    dto::products::ProductDto,
    models::ProductId,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    /// Defaults to 1.
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub product: ProductDto,
    pub quantity: i32,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItemDto>,
    pub total_items: i64,
    pub total_price: i64,
}

impl CartView {
    /// Lines whose product left the catalog are omitted, and both totals
    /// cover only the lines that are shown.
    pub fn build(cart: &Cart, catalog: &Catalog) -> Self {
        let items: Vec<CartItemDto> = cart
            .lines()
            .iter()
            .filter_map(|line| {
                catalog.get(line.product_id).map(|product| CartItemDto {
                    product: ProductDto::from(product),
                    quantity: line.quantity,
                    line_total: product.price * i64::from(line.quantity),
                })
            })
            .collect();
        Self {
            total_items: items.iter().map(|item| i64::from(item.quantity)).sum(),
            total_price: cart.total_price(catalog),
            items,
        }
    }
}
