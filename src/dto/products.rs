use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Product, ProductId};

/// Product as shown to shoppers; `image` is never empty.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
    pub category: String,
    pub image: String,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            category: product.category.clone(),
            image: product.image_or_placeholder().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<ProductDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryList {
    pub items: Vec<Category>,
}
